// src/handlers/order_products.rs

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
    models::orders::{CreateOrderProductPayload, OrderProduct, UpdateOrderProductPayload},
};

fn line_item_not_found() -> AppError {
    AppError::NotFound("Order product not found".into())
}

#[utoipa::path(
    get,
    path = "/api/orders_products",
    tag = "Order Products",
    responses((status = 200, description = "Todas as linhas de pedido", body = [OrderProduct])),
    security(("api_jwt" = []))
)]
pub async fn list_order_products(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
) -> Result<Json<Vec<OrderProduct>>, AppError> {
    Ok(Json(app_state.order_product_repo.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/orders_products/{order_id}/{product_id}",
    tag = "Order Products",
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("product_id" = Uuid, Path, description = "ID do produto")
    ),
    responses(
        (status = 200, description = "Linha encontrada", body = OrderProduct),
        (status = 404, description = "Linha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order_product(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path((order_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OrderProduct>, AppError> {
    let item = app_state
        .order_product_repo
        .find(&app_state.db_pool, order_id, product_id)
        .await?
        .ok_or_else(line_item_not_found)?;
    Ok(Json(item))
}

#[utoipa::path(
    get,
    path = "/api/orders_products/order/{id}",
    tag = "Order Products",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Linhas do pedido", body = [OrderProduct]),
        (status = 404, description = "Nenhuma linha para o pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_by_order(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<OrderProduct>>, AppError> {
    let items = app_state
        .order_product_repo
        .list_by_order(&app_state.db_pool, order_id)
        .await?;
    if items.is_empty() {
        return Err(AppError::NotFound(format!(
            "No order products found for order with id: {}",
            order_id
        )));
    }
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/orders_products/product/{id}",
    tag = "Order Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Linhas que usam o produto", body = [OrderProduct]),
        (status = 404, description = "Nenhuma linha para o produto")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_by_product(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<OrderProduct>>, AppError> {
    let items = app_state.order_product_repo.list_by_product(product_id).await?;
    if items.is_empty() {
        return Err(AppError::NotFound(format!(
            "No order products found for product with id: {}",
            product_id
        )));
    }
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/orders_products",
    tag = "Order Products",
    request_body = CreateOrderProductPayload,
    responses(
        (status = 201, description = "Linha criada", body = OrderProduct),
        (status = 404, description = "Pedido ou produto não encontrado"),
        (status = 409, description = "O produto já está no pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order_product(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Json(payload): Json<CreateOrderProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pool = &app_state.db_pool;
    if !app_state.order_repo.exists(pool, payload.order_id).await? {
        return Err(AppError::not_found("Order"));
    }
    if !app_state.product_repo.exists(pool, payload.product_id).await? {
        return Err(AppError::not_found("Product"));
    }

    let item = app_state
        .order_product_repo
        .create(pool, payload.order_id, payload.product_id, payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/orders_products/{order_id}/{product_id}",
    tag = "Order Products",
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("product_id" = Uuid, Path, description = "ID do produto")
    ),
    request_body = UpdateOrderProductPayload,
    responses(
        (status = 200, description = "Quantidade atualizada", body = OrderProduct),
        (status = 404, description = "Linha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_product(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path((order_id, product_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateOrderProductPayload>,
) -> Result<Json<OrderProduct>, AppError> {
    payload.validate()?;

    let item = app_state
        .order_product_repo
        .update_quantity(order_id, product_id, payload.quantity)
        .await?
        .ok_or_else(line_item_not_found)?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/orders_products/{order_id}/{product_id}",
    tag = "Order Products",
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("product_id" = Uuid, Path, description = "ID do produto")
    ),
    responses(
        (status = 200, description = "Linha removida", body = OrderProduct),
        (status = 404, description = "Linha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order_product(
    State(app_state): State<AppState>,
    _staff: RequireRole<Staff>,
    Path((order_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OrderProduct>, AppError> {
    let item = app_state
        .order_product_repo
        .delete(&app_state.db_pool, order_id, product_id)
        .await?
        .ok_or_else(line_item_not_found)?;
    Ok(Json(item))
}
