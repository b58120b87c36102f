// src/handlers/operations.rs

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
    models::operations::{
        CreateOperationPayload, Operation, OperationDetail, UpdateOperationPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/operations",
    tag = "Operations",
    responses((status = 200, description = "Todas as operações", body = [Operation])),
    security(("api_jwt" = []))
)]
pub async fn list_operations(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
) -> Result<Json<Vec<Operation>>, AppError> {
    Ok(Json(app_state.operation_service.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/operations/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    responses(
        (status = 200, description = "Operação encontrada", body = Operation),
        (status = 404, description = "Operação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_operation(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<Operation>, AppError> {
    Ok(Json(app_state.operation_service.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/operations/{id}/details",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    responses(
        (status = 200, description = "Operação com nomes do navio e do porto", body = OperationDetail),
        (status = 404, description = "Operação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_operation_details(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<OperationDetail>, AppError> {
    Ok(Json(app_state.operation_service.get_details(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/operations/port/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID do porto")),
    responses(
        (status = 200, description = "Operações do porto", body = [Operation]),
        (status = 404, description = "Nenhuma operação para o porto")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_operations_by_port(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(port_id): Path<Uuid>,
) -> Result<Json<Vec<Operation>>, AppError> {
    Ok(Json(app_state.operation_service.list_by_port(port_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/operations/ship/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID do navio")),
    responses(
        (status = 200, description = "Operações do navio", body = [Operation]),
        (status = 404, description = "Nenhuma operação para o navio")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_operations_by_ship(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(ship_id): Path<Uuid>,
) -> Result<Json<Vec<Operation>>, AppError> {
    Ok(Json(app_state.operation_service.list_by_ship(ship_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/operations/order/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Operações do pedido", body = [Operation]),
        (status = 404, description = "Nenhuma operação para o pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_operations_by_order(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<Operation>>, AppError> {
    Ok(Json(app_state.operation_service.list_by_order(order_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/operations",
    tag = "Operations",
    request_body = CreateOperationPayload,
    responses(
        (status = 201, description = "Operação registrada", body = Operation),
        (status = 404, description = "Navio, porto ou pedido não encontrado"),
        (status = 409, description = "Operação duplicada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_operation(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Json(payload): Json<CreateOperationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let operation = app_state.operation_service.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(operation)))
}

#[utoipa::path(
    put,
    path = "/api/operations/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    request_body = UpdateOperationPayload,
    responses(
        (status = 200, description = "Operação atualizada", body = Operation),
        (status = 404, description = "Operação ou referência não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_operation(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOperationPayload>,
) -> Result<Json<Operation>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.operation_service.update(id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/operations/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    responses(
        (status = 200, description = "Operação removida", body = Operation),
        (status = 404, description = "Operação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_operation(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<Operation>, AppError> {
    Ok(Json(app_state.operation_service.delete(id).await?))
}
