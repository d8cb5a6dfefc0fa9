use std::time::Duration;

use payloads::{ClientError, HttpMethod, RequestBody, SecretStore};
use serde_json::json;
use test_helpers::spawn_app;

fn canned(status: u16, body: serde_json::Value) -> Option<RequestBody> {
    Some(RequestBody::Json(json!({ "status": status, "body": body })))
}

#[tokio::test]
async fn server_error_message_is_extracted() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let envelope = app
        .client
        .request(
            "/api/test/respond",
            HttpMethod::Post,
            canned(500, json!({ "message": "Internal error" })),
        )
        .await;
    let error = envelope.error().cloned().unwrap();
    assert_eq!(error.to_string(), "Internal error");
    assert_eq!(error.status().map(|s| s.as_u16()), Some(500));

    Ok(())
}

#[tokio::test]
async fn error_without_message_falls_back_to_status_text() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let envelope = app
        .client
        .request("/api/test/respond", HttpMethod::Post, canned(503, json!("down")))
        .await;
    assert_eq!(
        envelope.error().map(ToString::to_string).as_deref(),
        Some("HTTP 503: Service Unavailable")
    );

    Ok(())
}

#[tokio::test]
async fn success_false_is_an_error_even_with_200() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let envelope = app
        .client
        .request(
            "/api/test/respond",
            HttpMethod::Post,
            canned(200, json!({ "success": false, "message": "Shop is closed" })),
        )
        .await;
    assert_eq!(
        envelope.error(),
        Some(&ClientError::Rejected("Shop is closed".into()))
    );

    Ok(())
}

#[tokio::test]
async fn empty_success_body_is_null_data() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let envelope = app
        .client
        .request("/api/test/respond", HttpMethod::Post, canned(204, json!(null)))
        .await;
    assert_eq!(envelope.into_result()?, serde_json::Value::Null);

    Ok(())
}

#[tokio::test]
async fn slow_response_times_out() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = app.client_with_timeout(Duration::from_millis(100));

    let started = std::time::Instant::now();
    let envelope = client
        .request("/api/test/delay/2000", HttpMethod::Get, None)
        .await;
    assert_eq!(envelope.error(), Some(&ClientError::Timeout));
    assert_eq!(envelope.error().map(ToString::to_string).as_deref(), Some("Request timeout"));
    assert!(started.elapsed() < Duration::from_millis(1500));

    let envelope = client.request("/api/test/delay/10", HttpMethod::Get, None).await;
    assert_eq!(envelope.into_result()?["delayedMs"], 10);

    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let mut client = app.client_with_timeout(Duration::from_secs(5));
    // port 9 (discard) is closed on test machines
    client.address = "http://127.0.0.1:9".into();

    let envelope = client.request("/api/test/whoami", HttpMethod::Get, None).await;
    let error = envelope.error().cloned().unwrap();
    assert!(matches!(error, ClientError::Network(_)));
    assert_eq!(error.user_message(), "Connection error, please retry.");

    Ok(())
}

#[tokio::test]
async fn empty_endpoint_never_reaches_the_network() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let envelope = app.client.request("  ", HttpMethod::Get, None).await;
    assert_eq!(envelope.error(), Some(&ClientError::InvalidEndpoint));

    Ok(())
}

#[tokio::test]
async fn token_is_read_on_every_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let whoami = || app.client.request("/api/test/whoami", HttpMethod::Get, None);

    let anonymous = whoami().await.into_result()?;
    assert_eq!(anonymous["authorization"], serde_json::Value::Null);

    app.secrets.set("token", "first");
    let first = whoami().await.into_result()?;
    assert_eq!(first["authorization"], "Bearer first");

    app.secrets.set("token", "second");
    let second = whoami().await.into_result()?;
    assert_eq!(second["authorization"], "Bearer second");

    app.secrets.clear();
    let cleared = whoami().await.into_result()?;
    assert_eq!(cleared["authorization"], serde_json::Value::Null);

    Ok(())
}
