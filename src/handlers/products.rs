// src/handlers/products.rs

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
    models::{
        catalog::{CreateProductPayload, Product, UpdateProductPayload},
        fleet::ImageUploadPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses((status = 200, description = "Todos os produtos", body = [Product])),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.product_repo.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/products/port/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do porto")),
    responses((status = 200, description = "Produtos do porto", body = [Product])),
    security(("api_jwt" = []))
)]
pub async fn list_products_by_port(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path(port_id): Path<Uuid>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.product_repo.list_by_port(port_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto encontrado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = app_state
        .product_repo
        .find_by_id(&app_state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 404, description = "Porto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.product_repo.create(&payload).await?;
    tracing::info!("Product {} created at port {}", product.id, payload.port_id);

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto ou porto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    let product = app_state
        .product_repo
        .update(id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido das linhas de pedido e excluído", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(app_state.cascade_service.delete_product(id).await?))
}

// --- Imagem ---

#[utoipa::path(
    put,
    path = "/api/products/{id}/image",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ImageUploadPayload,
    responses(
        (status = 204, description = "Imagem gravada"),
        (status = 400, description = "Base64 ou imagem inválida"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_product_image(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImageUploadPayload>,
) -> Result<StatusCode, AppError> {
    let bytes = images::decode_upload(&payload.image)?;

    if !app_state.product_repo.set_image(id, &bytes).await? {
        return Err(AppError::not_found("Product"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/image",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Imagem do produto (ou placeholder)", content_type = "image/png"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product_image(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let stored = app_state
        .product_repo
        .find_image(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    images::image_response(stored)
}
