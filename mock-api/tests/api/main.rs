use serde_json::{Value, json};
use test_helpers::spawn_app;

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let body = reqwest::get(format!("{}/api/health_check", app.address()))
        .await?
        .text()
        .await?;
    assert_eq!(body, "healthy");

    Ok(())
}

#[tokio::test]
async fn admin_routes_require_a_bearer_token() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for token in [None, Some("Bearer "), Some("Bearer made-up"), Some("Basic abc")] {
        let mut request = client.get(format!("{}/api/admin/products", app.address()));
        if let Some(token) = token {
            request = request.header("Authorization", token);
        }
        let response = request.send().await?;
        assert_eq!(response.status().as_u16(), 401, "token: {token:?}");
        let body: Value = response.json().await?;
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }

    Ok(())
}

#[tokio::test]
async fn lists_are_wrapped_spring_pages() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let login = app.login_admin().await?;
    app.create_test_products(3)?;

    let body: Value = reqwest::Client::new()
        .get(format!("{}/api/admin/products?page=0&size=2", app.address()))
        .bearer_auth(&login.access_token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalElements"], 3);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["number"], 0);
    assert_eq!(body["data"]["content"].as_array().map(Vec::len), Some(2));

    Ok(())
}

#[tokio::test]
async fn malformed_input_gets_a_message() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let login = app.login_admin().await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/admin/products?page=minus-one", app.address()))
        .bearer_auth(&login.access_token)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await?;
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Invalid query"));

    let response = client
        .post(format!("{}/api/back-office/auth/login", app.address()))
        .json(&json!({ "email": "admin@foodshare.vn" }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    Ok(())
}
