// src/handlers/ships.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, images},
    config::AppState,
    middleware::rbac::{Customers, RequireRole, Staff},
    models::fleet::{CreateShipPayload, ImageUploadPayload, Ship, UpdateShipPayload},
};

#[utoipa::path(
    get,
    path = "/api/ships",
    tag = "Ships",
    responses((status = 200, description = "Todos os navios", body = [Ship])),
    security(("api_jwt" = []))
)]
pub async fn list_ships(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
) -> Result<Json<Vec<Ship>>, AppError> {
    Ok(Json(app_state.ship_repo.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/ships/{id}",
    tag = "Ships",
    params(("id" = Uuid, Path, description = "ID do navio")),
    responses(
        (status = 200, description = "Navio encontrado", body = Ship),
        (status = 404, description = "Navio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_ship(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ship>, AppError> {
    let ship = app_state
        .ship_repo
        .find_by_id(&app_state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Ship"))?;
    Ok(Json(ship))
}

#[utoipa::path(
    post,
    path = "/api/ships",
    tag = "Ships",
    request_body = CreateShipPayload,
    responses(
        (status = 201, description = "Navio criado", body = Ship),
        (status = 400, description = "Capacidade inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_ship(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Json(payload): Json<CreateShipPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ship = app_state.ship_repo.create(&payload).await?;
    tracing::info!("Ship {} created ({})", ship.id, ship.name);

    Ok((StatusCode::CREATED, Json(ship)))
}

#[utoipa::path(
    put,
    path = "/api/ships/{id}",
    tag = "Ships",
    params(("id" = Uuid, Path, description = "ID do navio")),
    request_body = UpdateShipPayload,
    responses(
        (status = 200, description = "Navio atualizado", body = Ship),
        (status = 404, description = "Navio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ship(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShipPayload>,
) -> Result<Json<Ship>, AppError> {
    payload.validate()?;

    let ship = app_state
        .ship_repo
        .update(id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Ship"))?;
    Ok(Json(ship))
}

#[utoipa::path(
    delete,
    path = "/api/ships/{id}",
    tag = "Ships",
    params(("id" = Uuid, Path, description = "ID do navio")),
    responses(
        (status = 200, description = "Navio removido com suas operações", body = Ship),
        (status = 404, description = "Navio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_ship(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ship>, AppError> {
    Ok(Json(app_state.cascade_service.delete_ship(id).await?))
}

// --- Imagem ---

#[utoipa::path(
    put,
    path = "/api/ships/{id}/image",
    tag = "Ships",
    params(("id" = Uuid, Path, description = "ID do navio")),
    request_body = ImageUploadPayload,
    responses(
        (status = 204, description = "Imagem gravada"),
        (status = 400, description = "Base64 ou imagem inválida"),
        (status = 404, description = "Navio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_ship_image(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImageUploadPayload>,
) -> Result<StatusCode, AppError> {
    let bytes = images::decode_upload(&payload.image)?;

    if !app_state.ship_repo.set_image(id, &bytes).await? {
        return Err(AppError::not_found("Ship"));
    }
    tracing::info!("Ship {} image updated ({} bytes)", id, bytes.len());
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/ships/{id}/image",
    tag = "Ships",
    params(("id" = Uuid, Path, description = "ID do navio")),
    responses(
        (status = 200, description = "Imagem do navio (ou placeholder)", content_type = "image/png"),
        (status = 404, description = "Navio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_ship_image(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let stored = app_state
        .ship_repo
        .find_image(id)
        .await?
        .ok_or_else(|| AppError::not_found("Ship"))?;
    images::image_response(stored)
}
