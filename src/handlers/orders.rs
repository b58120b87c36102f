// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::auth::ensure_self_or_staff,
    middleware::rbac::{Customers, RequireRole, Staff},
    models::orders::{CreateOrderPayload, DeletedOrder, Order, UpdateOrderPayload},
};

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses((status = 200, description = "Todos os pedidos", body = [Order])),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(app_state.order_service.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido encontrado", body = Order),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(app_state.order_service.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/port/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do porto")),
    responses(
        (status = 200, description = "Pedidos do porto", body = [Order]),
        (status = 404, description = "Nenhum pedido para o porto")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders_by_port(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(port_id): Path<Uuid>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(app_state.order_service.list_by_port(port_id).await?))
}

// O próprio cliente também pode listar os seus pedidos
#[utoipa::path(
    get,
    path = "/api/orders/client/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Pedidos do cliente", body = [Order]),
        (status = 404, description = "Nenhum pedido para o cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders_by_client(
    State(app_state): State<AppState>,
    RequireRole(caller, _): RequireRole<Customers>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<Order>>, AppError> {
    ensure_self_or_staff(&caller, client_id)?;
    Ok(Json(app_state.order_service.list_by_client(client_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado", body = Order),
        (status = 404, description = "Porto ou cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state.order_service.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdateOrderPayload,
    responses(
        (status = 200, description = "Pedido atualizado", body = Order),
        (status = 400, description = "Transição de status não permitida"),
        (status = 404, description = "Pedido, porto ou cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<Json<Order>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.order_service.update(id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido removido em cascata", body = DeletedOrder),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedOrder>, AppError> {
    Ok(Json(app_state.order_service.delete(id).await?))
}
