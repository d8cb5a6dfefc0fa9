use actix_web::{HttpRequest, HttpResponse, get, put, web};
use payloads::OrderId;
use payloads::requests::UpdateOrderStatus;

use crate::store::{Backend, ListParams};

use super::{APIError, require_admin, success};

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[get("/admin/orders")]
pub async fn list_orders(
    request: HttpRequest,
    params: web::Query<ListParams>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.list_orders(&params)))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[get("/admin/orders/{id}")]
pub async fn get_order(
    request: HttpRequest,
    order_id: web::Path<i64>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    Ok(success(backend.get_order(OrderId(*order_id))?))
}

#[tracing::instrument(skip(request, backend), fields(user_id = tracing::field::Empty))]
#[put("/admin/orders/{id}/status")]
pub async fn update_order_status(
    request: HttpRequest,
    order_id: web::Path<i64>,
    details: web::Json<UpdateOrderStatus>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &backend)?;
    let order = backend.update_order_status(OrderId(*order_id), details.status)?;
    Ok(success(order))
}
