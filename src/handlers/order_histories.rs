// src/handlers/order_histories.rs

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
    middleware::rbac::{RequireRole, Staff},
    models::orders::{CreateOrderHistoryPayload, OrderHistory, UpdateOrderHistoryPayload},
};

#[utoipa::path(
    get,
    path = "/api/order_histories",
    tag = "Order Histories",
    responses((status = 200, description = "Todo o histórico", body = [OrderHistory])),
    security(("api_jwt" = []))
)]
pub async fn list_histories(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
) -> Result<Json<Vec<OrderHistory>>, AppError> {
    Ok(Json(app_state.order_history_repo.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/order_histories/{id}",
    tag = "Order Histories",
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Registro encontrado", body = OrderHistory),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_history(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderHistory>, AppError> {
    let entry = app_state
        .order_history_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Order history"))?;
    Ok(Json(entry))
}

#[utoipa::path(
    post,
    path = "/api/order_histories",
    tag = "Order Histories",
    request_body = CreateOrderHistoryPayload,
    responses(
        (status = 201, description = "Registro criado", body = OrderHistory),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_history(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Json(payload): Json<CreateOrderHistoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // A FK de order_id devolve "Order not found"
    let entry = app_state.order_history_repo.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    put,
    path = "/api/order_histories/{id}",
    tag = "Order Histories",
    params(("id" = Uuid, Path, description = "ID do registro")),
    request_body = UpdateOrderHistoryPayload,
    responses(
        (status = 200, description = "Registro atualizado", body = OrderHistory),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_history(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderHistoryPayload>,
) -> Result<Json<OrderHistory>, AppError> {
    payload.validate()?;

    let entry = app_state
        .order_history_repo
        .update(id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Order history"))?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/order_histories/{id}",
    tag = "Order Histories",
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Registro removido", body = OrderHistory),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_history(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderHistory>, AppError> {
    let entry = app_state
        .order_history_repo
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found("Order history"))?;
    Ok(Json(entry))
}
