use std::rc::Rc;
use std::time::Duration;

use fetch_state::{Resource, ResourceOptions};
use payloads::{HttpMethod, ProductId};
use test_helpers::spawn_app;

#[tokio::test]
async fn timed_out_fetch_lands_an_error_and_nothing_later() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = Rc::new(app.client_with_timeout(Duration::from_millis(100)));

    let slow = {
        let client = client.clone();
        Resource::new(
            move || {
                let client = client.clone();
                async move {
                    client
                        .request("/api/test/delay/400", HttpMethod::Get, None)
                        .await
                }
            },
            ResourceOptions::default(),
        )
    };

    slow.execute().await;
    let state = slow.state();
    assert_eq!(state.error_message().as_deref(), Some("Request timeout"));
    assert!(!state.is_loading());

    // the dropped request never writes to the state afterwards
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(slow.state(), state);

    Ok(())
}

#[tokio::test]
async fn detail_resource_follows_its_key() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let (_, products) = app.create_test_products(2)?;
    let client = Rc::new(app.client);

    let detail = {
        let client = client.clone();
        Resource::keyed(
            move |id: ProductId| {
                let client = client.clone();
                async move { client.get_product(id).await }
            },
            ResourceOptions::default(),
        )
    };

    detail.execute().await;
    assert!(detail.state().is_idle());

    detail.set_key(Some(products[1].id)).await;
    assert_eq!(detail.state().data().map(|p| p.name.as_str()), Some("Dish 2"));

    detail.set_key(Some(ProductId(999_999))).await;
    let state = detail.state();
    assert_eq!(state.data(), None);
    assert_eq!(state.error_message().as_deref(), Some("Product not found"));

    detail.reset();
    assert!(detail.state().is_idle());

    Ok(())
}
