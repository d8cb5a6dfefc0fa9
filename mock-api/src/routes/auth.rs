use actix_web::{HttpRequest, HttpResponse, get, post, web};
use payloads::requests::LoginCredentials;

use crate::store::Backend;

use super::{APIError, authenticate, success};

#[tracing::instrument(
    skip(credentials, backend),
    fields(email = %credentials.email),
    err(Display),
)]
#[post("/back-office/auth/login")]
pub async fn login(
    credentials: web::Json<LoginCredentials>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    let login = backend.login(&credentials)?;
    Ok(success(login))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[get("/back-office/auth/me")]
pub async fn me(
    request: HttpRequest,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    let user = authenticate(&request, &backend)?;
    Ok(success(user))
}
