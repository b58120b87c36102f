// src/handlers/ports.rs

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
    models::fleet::{CreatePortPayload, Port, UpdatePortPayload},
};

#[utoipa::path(
    get,
    path = "/api/ports",
    tag = "Ports",
    responses((status = 200, description = "Todos os portos", body = [Port])),
    security(("api_jwt" = []))
)]
pub async fn list_ports(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
) -> Result<Json<Vec<Port>>, AppError> {
    Ok(Json(app_state.port_repo.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/ports/{id}",
    tag = "Ports",
    params(("id" = Uuid, Path, description = "ID do porto")),
    responses(
        (status = 200, description = "Porto encontrado", body = Port),
        (status = 404, description = "Porto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_port(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<Port>, AppError> {
    let port = app_state
        .port_repo
        .find_by_id(&app_state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Port"))?;
    Ok(Json(port))
}

#[utoipa::path(
    post,
    path = "/api/ports",
    tag = "Ports",
    request_body = CreatePortPayload,
    responses((status = 201, description = "Porto criado", body = Port)),
    security(("api_jwt" = []))
)]
pub async fn create_port(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Json(payload): Json<CreatePortPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let port = app_state.port_repo.create(&payload).await?;
    tracing::info!("Port {} created ({})", port.id, port.name);

    Ok((StatusCode::CREATED, Json(port)))
}

#[utoipa::path(
    put,
    path = "/api/ports/{id}",
    tag = "Ports",
    params(("id" = Uuid, Path, description = "ID do porto")),
    request_body = UpdatePortPayload,
    responses(
        (status = 200, description = "Porto atualizado", body = Port),
        (status = 404, description = "Porto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_port(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePortPayload>,
) -> Result<Json<Port>, AppError> {
    payload.validate()?;

    let port = app_state
        .port_repo
        .update(id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Port"))?;
    Ok(Json(port))
}

#[utoipa::path(
    delete,
    path = "/api/ports/{id}",
    tag = "Ports",
    params(("id" = Uuid, Path, description = "ID do porto")),
    responses(
        (status = 200, description = "Porto removido com seus pedidos e operações", body = Port),
        (status = 404, description = "Porto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_port(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<Port>, AppError> {
    Ok(Json(app_state.cascade_service.delete_port(id).await?))
}
