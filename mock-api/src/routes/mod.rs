pub mod auth;
pub mod orders;
pub mod products;
pub mod shops;
#[cfg(feature = "test-routes")]
pub mod testing;
pub mod users;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{
    HttpRequest, HttpResponse, Responder, ResponseError, body::BoxBody,
    dev::HttpServiceFactory, get, http::StatusCode, web,
};
use payloads::AuthenticatedUser;
use serde::Serialize;

use crate::store::{Backend, StoreError};

pub fn api_services() -> impl HttpServiceFactory {
    let scope = web::scope("/api")
        .service(health_check)
        .service(auth::login)
        .service(auth::me)
        .service(shops::list_stores)
        .service(shops::get_store)
        .service(shops::update_store)
        .service(shops::update_store_status)
        .service(shops::delete_store)
        .service(products::list_products)
        .service(products::get_product)
        .service(products::update_product)
        .service(products::update_product_status)
        .service(products::delete_product)
        .service(orders::list_orders)
        .service(orders::get_order)
        .service(orders::update_order_status)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user);

    #[cfg(feature = "test-routes")]
    let scope = scope
        .service(testing::respond)
        .service(testing::delay)
        .service(testing::whoami);

    scope
}

/// Malformed bodies and query strings get the same `{message}` shape as
/// every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _| {
        APIError::BadRequest(anyhow::anyhow!("Invalid request body: {err}")).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _| {
        APIError::BadRequest(anyhow::anyhow!("Invalid query: {err}")).into()
    })
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("healthy")
}

#[derive(Serialize)]
struct Success<T> {
    success: bool,
    data: T,
}

/// `200 {"success": true, "data": ...}`
fn success(data: impl Serialize) -> HttpResponse {
    HttpResponse::Ok().json(Success {
        success: true,
        data,
    })
}

#[derive(Serialize)]
struct Failure {
    success: bool,
    message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication failed")]
    AuthError(#[source] anyhow::Error),
    #[error("Forbidden")]
    Forbidden(#[source] anyhow::Error),
    #[error("Bad request")]
    BadRequest(#[source] anyhow::Error),
    #[error("Not found")]
    NotFound(#[source] anyhow::Error),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ResponseError for APIError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthError(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let message = match self {
            Self::AuthError(e)
            | Self::Forbidden(e)
            | Self::BadRequest(e)
            | Self::NotFound(e) => e.to_string(),
            Self::UnexpectedError(_) => self.to_string(),
        };
        HttpResponse::build(self.status_code()).json(Failure {
            success: false,
            message,
        })
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidCredentials
            | StoreError::AccountDisabled
            | StoreError::InvalidToken => APIError::AuthError(e.into()),
            StoreError::RequiresAdmin => APIError::Forbidden(e.into()),
            StoreError::StoreNotFound
            | StoreError::ProductNotFound
            | StoreError::OrderNotFound
            | StoreError::UserNotFound => APIError::NotFound(e.into()),
            _ => APIError::BadRequest(e.into()),
        }
    }
}

/// Resolve the caller from the `Authorization: Bearer` header.
fn authenticate(
    request: &HttpRequest,
    backend: &Backend,
) -> Result<AuthenticatedUser, APIError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            APIError::AuthError(anyhow::anyhow!("Missing bearer token"))
        })?;
    let user = backend.authenticate(token)?;
    // recorded here, but attaches to the span for the api route itself
    tracing::Span::current().record("user_id", tracing::field::display(&user.id));
    Ok(user)
}

/// Like [`authenticate`], for routes under `/api/admin` and the back-office
/// account routes.
fn require_admin(
    request: &HttpRequest,
    backend: &Backend,
) -> Result<AuthenticatedUser, APIError> {
    let user = authenticate(request, backend)?;
    if !user.role.is_admin() {
        return Err(StoreError::RequiresAdmin.into());
    }
    Ok(user)
}
