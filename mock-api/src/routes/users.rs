use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use payloads::UserId;
use payloads::requests::{CreateUser, UpdateUser};

use crate::store::{Backend, ListParams};

use super::{APIError, require_admin, success};

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[get("/back-office/users")]
pub async fn list_users(
    request: HttpRequest,
    params: web::Query<ListParams>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.list_users(&params)))
}

#[tracing::instrument(
    skip(request, details, backend),
    fields(user_id = tracing::field::Empty, email = %details.email),
)]
#[post("/back-office/users")]
pub async fn create_user(
    request: HttpRequest,
    details: web::Json<CreateUser>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.create_user(&details)?))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[put("/back-office/users/{id}")]
pub async fn update_user(
    request: HttpRequest,
    target: web::Path<i64>,
    details: web::Json<UpdateUser>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.update_user(UserId(*target), &details)?))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[delete("/back-office/users/{id}")]
pub async fn delete_user(
    request: HttpRequest,
    target: web::Path<i64>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    let admin = require_admin(&request, &backend)?;
    if admin.id.0 == *target {
        return Err(APIError::BadRequest(anyhow::anyhow!(
            "You cannot delete your own account"
        )));
    }
    backend.delete_user(UserId(*target))?;
    Ok(success(()))
}
