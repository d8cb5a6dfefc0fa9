mod lists;
mod session;
mod transport;

use test_helpers::spawn_app;

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let envelope = app
        .client
        .request("/api/health_check", payloads::HttpMethod::Get, None)
        .await;
    // a plain-text 200 is not JSON
    assert!(matches!(
        envelope.error(),
        Some(payloads::ClientError::Decode(_))
    ));

    Ok(())
}
