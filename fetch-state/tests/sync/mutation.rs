use std::rc::Rc;

use fetch_state::Mutation;
use payloads::ProductId;
use test_helpers::spawn_app;

use crate::product_list;

#[tokio::test]
async fn deleting_a_product_refreshes_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let (_, products) = app.create_test_products(12)?;
    let client = Rc::new(app.client);
    let list = product_list(client.clone(), 10);
    list.start().await;
    let before = list.view().total_items;

    let delete = {
        let client = client.clone();
        Mutation::new(move |id: ProductId| {
            let client = client.clone();
            async move { client.delete_product(id).await }
        })
    };
    delete.invalidates(list.clone());

    assert!(delete.execute(products[0].id).await);
    assert_eq!(list.view().total_items, before - 1);
    assert!(!list.view().items.iter().any(|p| p.id == products[0].id));

    Ok(())
}

#[tokio::test]
async fn deleting_the_last_row_of_the_last_page_moves_back() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let (_, products) = app.create_test_products(11)?;
    let client = Rc::new(app.client);
    let list = product_list(client.clone(), 10);
    list.start().await;
    list.set_page(1).await;
    let only_row = list.view().items[0].id;
    assert!(products.iter().any(|p| p.id == only_row));

    let delete = {
        let client = client.clone();
        Mutation::new(move |id: ProductId| {
            let client = client.clone();
            async move { client.delete_product(id).await }
        })
    };
    delete.invalidates(list.clone());
    assert!(delete.execute(only_row).await);

    let view = list.view();
    assert_eq!(view.current_page, 0);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.items.len(), 10);

    Ok(())
}

#[tokio::test]
async fn failed_mutation_leaves_list_alone() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_test_products(4)?;
    let client = Rc::new(app.client);
    let list = product_list(client.clone(), 10);
    list.start().await;

    let delete = {
        let client = client.clone();
        Mutation::new(move |id: ProductId| {
            let client = client.clone();
            async move { client.delete_product(id).await }
        })
    };
    delete.invalidates(list.clone());

    assert!(!delete.execute(ProductId(424_242)).await);
    assert_eq!(
        delete.state().error_message().as_deref(),
        Some("Product not found")
    );
    assert_eq!(list.view().total_items, 4);

    Ok(())
}
