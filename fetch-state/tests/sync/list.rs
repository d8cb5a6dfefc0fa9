use std::rc::Rc;

use payloads::SortDirection;
use test_helpers::spawn_app;

use crate::product_list;

#[tokio::test]
async fn list_follows_filters_and_pages() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_test_products(23)?;
    let client = Rc::new(app.client);
    let list = product_list(client, 10);

    list.start().await;
    let view = list.view();
    assert_eq!(view.total_items, 23);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.items.len(), 10);

    list.next_page().await;
    list.next_page().await;
    let view = list.view();
    assert_eq!(view.current_page, 2);
    assert_eq!(view.items.len(), 3);
    assert!(!view.has_next);

    list.set_draft("search", "Dish 2");
    assert_eq!(list.view().current_page, 2);
    list.apply().await;
    let view = list.view();
    assert_eq!(view.current_page, 0);
    // Dish 2 and Dish 20..23
    assert_eq!(view.total_items, 5);

    list.set_sort("price", SortDirection::Asc).await;
    let names: Vec<String> = list.view().items.into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Dish 2", "Dish 20", "Dish 21", "Dish 22", "Dish 23"]);

    list.clear().await;
    assert_eq!(list.view().total_items, 23);

    Ok(())
}

#[tokio::test]
async fn expired_session_surfaces_as_list_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_test_products(3)?;
    let client = Rc::new(app.client);
    let list = product_list(client, 10);

    list.start().await;
    let view = list.view();
    assert!(!view.loading);
    assert!(view.items.is_empty());
    let error = view.error.unwrap();
    assert!(error.is_unauthorized());

    Ok(())
}
