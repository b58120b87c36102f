// src/handlers/auth.rs

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
    middleware::{
        auth::AuthenticatedUser,
        rbac::{check_role, Admins, RequireRole, RoleSet, Staff},
    },
    models::auth::{
        AuthResponse, Client, LoginPayload, RegisterClientPayload, UpdateClientPayload,
    },
};

// Staff vê qualquer cliente; os demais só a si mesmos
pub(crate) fn ensure_self_or_staff(caller: &Client, target: Uuid) -> Result<(), AppError> {
    if caller.id == target {
        return Ok(());
    }
    check_role(caller.role, Staff::roles())
}

// Handler de registro (rota pública)
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = RegisterClientPayload,
    responses(
        (status = 201, description = "Cliente cadastrado", body = Client),
        (status = 400, description = "Dados inválidos ou domínio de e-mail bloqueado"),
        (status = 409, description = "Login ou e-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client = app_state.auth_service.register_client(&payload).await?;

    Ok((StatusCode::CREATED, Json(client)))
}

// Handler de login (também exposto como /users/login)
#[utoipa::path(
    post,
    path = "/api/clients/login",
    tag = "Clients",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token emitido", body = AuthResponse),
        (status = 401, description = "Login ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let response = app_state
        .auth_service
        .login(&payload.logon_name, &payload.password)
        .await?;

    Ok(Json(response))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/clients/me",
    tag = "Clients",
    responses((status = 200, description = "Cliente autenticado", body = Client)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(client): AuthenticatedUser) -> Json<Client> {
    Json(client)
}

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses((status = 200, description = "Todos os clientes", body = [Client])),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
) -> Result<Json<Vec<Client>>, AppError> {
    Ok(Json(app_state.client_repo.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente encontrado", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    ensure_self_or_staff(&caller, id)?;

    let client = app_state
        .client_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Client"))?;
    Ok(Json(client))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateClientPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 403, description = "Alteração de role exige ADMIN"),
        (status = 409, description = "Login ou e-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<Json<Client>, AppError> {
    payload.validate()?;
    ensure_self_or_staff(&caller, id)?;

    if payload.role.is_some() {
        check_role(caller.role, Admins::roles())?;
    }

    let client = app_state.auth_service.update_client(id, &payload).await?;
    tracing::info!("Client {} updated by {}", id, caller.id);
    Ok(Json(client))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente removido; seus pedidos ficam sem dono", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    RequireRole(admin, _): RequireRole<Admins>,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = app_state
        .client_repo
        .delete_client(id)
        .await?
        .ok_or_else(|| AppError::not_found("Client"))?;

    tracing::info!("Client {} deleted by {}", id, admin.id);
    Ok(Json(client))
}
