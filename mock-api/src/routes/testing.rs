//! Routes that exist only so the client's failure handling can be exercised
//! against a real socket. None of them require a token.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, ContentType};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{APIError, success};

#[derive(Debug, Deserialize)]
pub struct Canned {
    pub status: u16,
    /// Sent verbatim if a string, as JSON otherwise.
    #[serde(default)]
    pub body: Value,
}

/// Reply with whatever status and body the caller asks for.
#[tracing::instrument(ret)]
#[post("/test/respond")]
pub async fn respond(canned: web::Json<Canned>) -> Result<HttpResponse, APIError> {
    let status = StatusCode::from_u16(canned.status)
        .map_err(|e| APIError::BadRequest(e.into()))?;
    let mut response = HttpResponse::build(status);
    Ok(match &canned.body {
        Value::String(text) => response.content_type(ContentType::plaintext()).body(text.clone()),
        Value::Null => response.finish(),
        body => response.json(body),
    })
}

/// Succeed after `ms` milliseconds.
#[tracing::instrument]
#[get("/test/delay/{ms}")]
pub async fn delay(ms: web::Path<u64>) -> HttpResponse {
    tokio::time::sleep(Duration::from_millis(*ms)).await;
    success(json!({ "delayedMs": *ms }))
}

/// Echo the Authorization header, or null if none was sent.
#[get("/test/whoami")]
pub async fn whoami(request: HttpRequest) -> HttpResponse {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    success(json!({ "authorization": authorization }))
}
