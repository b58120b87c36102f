// src/handlers/cart.rs

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{Customers, RequireRole},
    models::orders::{AddToCartPayload, CartResponse, Order, OrderProduct},
};

#[utoipa::path(
    post,
    path = "/api/cart",
    tag = "Cart",
    request_body = AddToCartPayload,
    responses(
        (status = 200, description = "Produto adicionado (quantidade acumulada)", body = CartResponse),
        (status = 400, description = "Pedido já enviado ou sem porto disponível"),
        (status = 404, description = "Produto ou pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_to_cart(
    State(app_state): State<AppState>,
    RequireRole(client, _): RequireRole<Customers>,
    Json(payload): Json<AddToCartPayload>,
) -> Result<Json<CartResponse>, AppError> {
    payload.validate()?;

    let cart = app_state
        .cart_service
        .add_to_cart(client.id, payload.order_id, payload.product_id, payload.quantity)
        .await?;

    Ok(Json(cart))
}

#[utoipa::path(
    get,
    path = "/api/cart/{order_id}",
    tag = "Cart",
    params(("order_id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Linhas do carrinho", body = [OrderProduct]),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cart(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<OrderProduct>>, AppError> {
    Ok(Json(app_state.cart_service.get_cart(order_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{order_id}/{product_id}",
    tag = "Cart",
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("product_id" = Uuid, Path, description = "ID do produto")
    ),
    responses(
        (status = 200, description = "Linha removida", body = OrderProduct),
        (status = 400, description = "Pedido não está PENDING"),
        (status = 404, description = "Pedido ou linha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_from_cart(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path((order_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OrderProduct>, AppError> {
    Ok(Json(
        app_state
            .cart_service
            .remove_item(order_id, product_id)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{order_id}",
    tag = "Cart",
    params(("order_id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Carrinho esvaziado"),
        (status = 400, description = "Pedido não está PENDING"),
        (status = 404, description = "Pedido não encontrado ou carrinho já vazio")
    ),
    security(("api_jwt" = []))
)]
pub async fn clear_cart(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let removed = app_state.cart_service.clear_cart(order_id).await?;
    Ok(Json(json!({ "orderId": order_id, "removedItems": removed })))
}

#[utoipa::path(
    post,
    path = "/api/checkout/{order_id}",
    tag = "Cart",
    params(("order_id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido enviado (SHIPPED)", body = Order),
        (status = 400, description = "Carrinho vazio ou pedido não está PENDING"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    _customer: RequireRole<Customers>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(app_state.cart_service.checkout(order_id).await?))
}
