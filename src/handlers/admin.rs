// src/handlers/admin.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{Admins, RequireRole},
    models::auth::{EmailBlockDomain, ReplaceBlocklistPayload},
};

#[utoipa::path(
    get,
    path = "/api/admin/email-blocklist",
    tag = "Admin",
    responses((status = 200, description = "Domínios bloqueados", body = [EmailBlockDomain])),
    security(("api_jwt" = []))
)]
pub async fn get_blocklist(
    State(app_state): State<AppState>,
    _admin: RequireRole<Admins>,
) -> Result<Json<Vec<EmailBlockDomain>>, AppError> {
    Ok(Json(app_state.auth_service.list_blocklist().await?))
}

/// Troca a lista inteira (não é um merge).
#[utoipa::path(
    put,
    path = "/api/admin/email-blocklist",
    tag = "Admin",
    request_body = ReplaceBlocklistPayload,
    responses((status = 200, description = "Nova lista de domínios bloqueados", body = [EmailBlockDomain])),
    security(("api_jwt" = []))
)]
pub async fn replace_blocklist(
    State(app_state): State<AppState>,
    RequireRole(admin, _): RequireRole<Admins>,
    Json(payload): Json<ReplaceBlocklistPayload>,
) -> Result<Json<Vec<EmailBlockDomain>>, AppError> {
    let domains = app_state
        .auth_service
        .replace_blocklist(&payload.domains)
        .await?;

    tracing::info!("Blocklist replaced by {} ({} domains)", admin.id, domains.len());
    Ok(Json(domains))
}
