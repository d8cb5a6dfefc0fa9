use payloads::requests::LoginCredentials;
use payloads::{ListQuery, Role, Session};
use test_helpers::{admin_credentials, spawn_app};

#[tokio::test]
async fn login_persists_token_and_user() -> anyhow::Result<()> {
    let app = spawn_app().await;
    assert!(app.client.current_user().is_none());

    let login = app.login_admin().await?;
    assert_eq!(login.user.role, Role::Admin);

    let user = app.client.current_user().unwrap();
    assert_eq!(user.email, admin_credentials().email);
    assert!(Session::is_authenticated(app.secrets.as_ref()));

    // the stored token opens the admin routes
    app.client
        .list_products(&ListQuery::default())
        .await
        .into_result()?;

    Ok(())
}

#[tokio::test]
async fn wrong_password_stores_nothing() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let envelope = app
        .client
        .login(&LoginCredentials {
            email: admin_credentials().email,
            password: "wrong".into(),
        })
        .await;
    let error = envelope.error().cloned().unwrap();
    assert!(error.is_unauthorized());
    assert_eq!(error.to_string(), "Invalid email or password");
    assert!(app.client.current_user().is_none());

    Ok(())
}

#[tokio::test]
async fn logout_takes_effect_on_the_next_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.client.list_stores(&ListQuery::default()).await.into_result()?;

    app.client.logout();
    assert!(app.client.current_user().is_none());

    let error = app
        .client
        .list_stores(&ListQuery::default())
        .await
        .into_result()
        .unwrap_err();
    assert!(error.is_unauthorized());
    assert_eq!(
        error.user_message(),
        "Authentication required. Please log in again."
    );

    Ok(())
}

#[tokio::test]
async fn sellers_cannot_use_admin_routes() -> anyhow::Result<()> {
    let app = spawn_app().await;
    test_helpers::mock::DevDataset::create(&app).await?;

    app.client
        .login(&LoginCredentials {
            email: "lan@foodshare.vn".into(),
            password: "seller123".into(),
        })
        .await
        .into_result()?;
    let error = app
        .client
        .list_orders(&ListQuery::default())
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(error.status().map(|s| s.as_u16()), Some(403));
    assert_eq!(error.to_string(), "Admin role required");

    Ok(())
}
