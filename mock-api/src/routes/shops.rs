use actix_web::{HttpRequest, HttpResponse, delete, get, put, web};
use payloads::StoreId;
use payloads::requests::{UpdateStore, UpdateStoreStatus};

use crate::store::{Backend, ListParams};

use super::{APIError, require_admin, success};

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[get("/admin/shops")]
pub async fn list_stores(
    request: HttpRequest,
    params: web::Query<ListParams>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.list_stores(&params)))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[get("/admin/shops/{id}")]
pub async fn get_store(
    request: HttpRequest,
    store_id: web::Path<i64>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.get_store(StoreId(*store_id))?))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[put("/admin/shops/{id}")]
pub async fn update_store(
    request: HttpRequest,
    store_id: web::Path<i64>,
    details: web::Json<UpdateStore>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.update_store(StoreId(*store_id), &details)?))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[put("/admin/shops/{id}/status")]
pub async fn update_store_status(
    request: HttpRequest,
    store_id: web::Path<i64>,
    details: web::Json<UpdateStoreStatus>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    let store = backend.update_store_status(StoreId(*store_id), details.status)?;
    Ok(success(store))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[delete("/admin/shops/{id}")]
pub async fn delete_store(
    request: HttpRequest,
    store_id: web::Path<i64>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    backend.delete_store(StoreId(*store_id))?;
    Ok(success(()))
}
