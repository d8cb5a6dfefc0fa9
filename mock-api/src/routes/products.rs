use actix_web::{HttpRequest, HttpResponse, delete, get, put, web};
use payloads::ProductId;
use payloads::requests::{UpdateProduct, UpdateProductStatus};

use crate::store::{Backend, ListParams};

use super::{APIError, require_admin, success};

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[get("/admin/products")]
pub async fn list_products(
    request: HttpRequest,
    params: web::Query<ListParams>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.list_products(&params)))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[get("/admin/products/{id}")]
pub async fn get_product(
    request: HttpRequest,
    product_id: web::Path<i64>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.get_product(ProductId(*product_id))?))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[put("/admin/products/{id}")]
pub async fn update_product(
    request: HttpRequest,
    product_id: web::Path<i64>,
    details: web::Json<UpdateProduct>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.update_product(ProductId(*product_id), &details)?))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[put("/admin/products/{id}/status")]
pub async fn update_product_status(
    request: HttpRequest,
    product_id: web::Path<i64>,
    details: web::Json<UpdateProductStatus>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    let product =
        backend.update_product_status(ProductId(*product_id), details.status)?;
    Ok(success(product))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[delete("/admin/products/{id}")]
pub async fn delete_product(
    request: HttpRequest,
    product_id: web::Path<i64>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    backend.delete_product(ProductId(*product_id))?;
    Ok(success(()))
}
