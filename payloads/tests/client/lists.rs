use payloads::requests::{CreateUser, UpdateProduct, UpdateUser};
use payloads::{
    Filters, ListQuery, OrderStatus, PageDescriptor, ProductId, ProductStatus,
    Role, SortDirection,
};
use rust_decimal::Decimal;
use test_helpers::spawn_app;

#[tokio::test]
async fn product_pages_carry_consistent_counters() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_test_products(25)?;

    let query = ListQuery::new(Filters::new(), PageDescriptor::new(10));
    let first = app.client.list_products(&query).await.into_result()?;
    assert_eq!(first.total_elements(), 25);
    assert_eq!(first.total_pages(), 3);
    assert_eq!(first.content().len(), 10);
    assert!(first.has_next());
    assert!(!first.has_previous());

    let mut last_page = query.clone();
    last_page.page.page = 2;
    let last = app.client.list_products(&last_page).await.into_result()?;
    assert_eq!(last.page(), 2);
    assert_eq!(last.content().len(), 5);
    assert!(!last.has_next());
    assert!(last.has_previous());

    Ok(())
}

#[tokio::test]
async fn filters_and_sort_reach_the_server() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let (_, products) = app.create_test_products(12)?;
    app.client
        .update_product_status(products[0].id, ProductStatus::Inactive)
        .await
        .into_result()?;

    let query = ListQuery::new(
        Filters::new().with("search", "dish 1").with("status", "ACTIVE"),
        PageDescriptor::new(10).with_sort("price", SortDirection::Desc),
    );
    let page = app.client.list_products(&query).await.into_result()?;
    // "Dish 1" is inactive; "Dish 10".."Dish 12" remain
    let names: Vec<&str> = page.content().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Dish 12", "Dish 11", "Dish 10"]);

    Ok(())
}

#[tokio::test]
async fn product_crud_round_trip() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let (_, products) = app.create_test_products(1)?;
    let id = products[0].id;

    let updated = app
        .client
        .update_product(
            id,
            &UpdateProduct {
                price: Some(Decimal::new(1250, 2)),
                ..Default::default()
            },
        )
        .await
        .into_result()?;
    assert_eq!(updated.price, Decimal::new(1250, 2));

    app.client.delete_product(id).await.into_result()?;
    let error = app.client.get_product(id).await.into_result().unwrap_err();
    assert_eq!(error.to_string(), "Product not found");
    assert_eq!(error.status().map(|s| s.as_u16()), Some(404));

    let missing = app.client.delete_product(ProductId(999_999)).await;
    assert!(!missing.is_success());

    Ok(())
}

#[tokio::test]
async fn final_orders_reject_status_changes() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let dataset = test_helpers::mock::DevDataset::create(&app).await?;
    let completed = dataset
        .orders
        .iter()
        .find(|o| o.status == OrderStatus::Completed)
        .unwrap();

    let error = app
        .client
        .update_order_status(completed.id, OrderStatus::Pending)
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(error.to_string(), "Order is already COMPLETED");

    let pending = dataset
        .orders
        .iter()
        .find(|o| o.status == OrderStatus::Pending)
        .unwrap();
    let confirmed = app
        .client
        .update_order_status(pending.id, OrderStatus::Confirmed)
        .await
        .into_result()?;
    assert_eq!(confirmed.status, OrderStatus::Confirmed);

    Ok(())
}

#[tokio::test]
async fn back_office_accounts() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let user = app
        .client
        .create_user(&CreateUser {
            name: "Trần Văn Bình".into(),
            email: "binh@foodshare.vn".into(),
            password: "binh1234".into(),
            role: Role::Seller,
            phone: None,
        })
        .await
        .into_result()?;
    assert!(user.active);

    let query = ListQuery::new(
        Filters::new().with("role", "SELLER"),
        PageDescriptor::default(),
    );
    let sellers = app.client.list_users(&query).await.into_result()?;
    assert_eq!(sellers.total_elements(), 1);

    let disabled = app
        .client
        .update_user(
            user.id,
            &UpdateUser {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .into_result()?;
    assert!(!disabled.active);

    app.client.delete_user(user.id).await.into_result()?;
    let everyone = app
        .client
        .list_users(&ListQuery::default())
        .await
        .into_result()?;
    assert_eq!(everyone.total_elements(), 1);

    Ok(())
}
