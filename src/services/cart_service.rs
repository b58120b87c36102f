// src/services/cart_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{order_repo::NewOrder, OrderProductRepository, OrderRepository, ProductRepository},
    models::orders::{CartResponse, Order, OrderProduct, OrderStatus},
};

/// Só pedidos PENDING aceitam mudanças no carrinho.
pub fn ensure_modifiable(order: &Order) -> Result<(), AppError> {
    if order.status != OrderStatus::Pending {
        return Err(AppError::DomainRule(format!(
            "cannot modify a {} order",
            order.status
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CartService {
    order_repo: OrderRepository,
    order_product_repo: OrderProductRepository,
    product_repo: ProductRepository,
    default_port_id: Option<Uuid>,
    pool: PgPool,
}

impl CartService {
    pub fn new(
        order_repo: OrderRepository,
        order_product_repo: OrderProductRepository,
        product_repo: ProductRepository,
        default_port_id: Option<Uuid>,
        pool: PgPool,
    ) -> Self {
        Self {
            order_repo,
            order_product_repo,
            product_repo,
            default_port_id,
            pool,
        }
    }

    /// Adiciona um produto ao carrinho.
    ///
    /// Sem `order_id`, abre um pedido PENDING para o cliente no porto do produto
    /// (ou no porto padrão configurado). Com `order_id`, o pedido fica travado
    /// (`FOR UPDATE`) até o commit, e a quantidade é somada à linha existente.
    pub async fn add_to_cart(
        &self,
        client_id: Uuid,
        order_id: Option<Uuid>,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .find_by_id(&mut *tx, product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))?;

        let order = match order_id {
            Some(order_id) => {
                let order = self
                    .order_repo
                    .find_for_update(&mut *tx, order_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Order"))?;
                ensure_modifiable(&order)?;
                order
            }
            None => {
                let port_id = product
                    .port_id
                    .or(self.default_port_id)
                    .ok_or_else(|| AppError::DomainRule("no port available for a new order".into()))?;

                let order = self
                    .order_repo
                    .create(
                        &mut *tx,
                        &NewOrder {
                            date_of_order: None,
                            status: OrderStatus::Pending,
                            description: None,
                            port_id,
                            client_id: Some(client_id),
                        },
                    )
                    .await?;
                tracing::info!("Cart order {} opened for client {}", order.id, client_id);
                order
            }
        };

        let item = self
            .order_product_repo
            .add_quantity(&mut *tx, order.id, product.id, quantity)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Cart {}: product {} now at quantity {}",
            order.id,
            item.product_id,
            item.quantity
        );
        Ok(CartResponse { order, item })
    }

    pub async fn get_cart(&self, order_id: Uuid) -> Result<Vec<OrderProduct>, AppError> {
        if !self.order_repo.exists(&self.pool, order_id).await? {
            return Err(AppError::not_found("Order"));
        }
        self.order_product_repo
            .list_by_order(&self.pool, order_id)
            .await
    }

    pub async fn remove_item(
        &self,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<OrderProduct, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_for_update(&mut *tx, order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;
        ensure_modifiable(&order)?;

        let removed = self
            .order_product_repo
            .delete(&mut *tx, order_id, product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product is not in the cart".into()))?;

        tx.commit().await?;
        Ok(removed)
    }

    /// Esvazia o carrinho; devolve quantas linhas saíram.
    pub async fn clear_cart(&self, order_id: Uuid) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_for_update(&mut *tx, order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;
        ensure_modifiable(&order)?;

        let removed = self
            .order_product_repo
            .delete_by_order(&mut *tx, order_id)
            .await?;
        if removed == 0 {
            return Err(AppError::NotFound("Cart is already empty".into()));
        }

        tx.commit().await?;
        tracing::info!("Cart {} cleared ({} items)", order_id, removed);
        Ok(removed)
    }

    /// Fecha o carrinho: PENDING e com pelo menos uma linha -> SHIPPED.
    pub async fn checkout(&self, order_id: Uuid) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_for_update(&mut *tx, order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;

        if order.status != OrderStatus::Pending {
            return Err(AppError::DomainRule(format!(
                "cannot checkout a {} order",
                order.status
            )));
        }

        let items = self
            .order_product_repo
            .count_by_order(&mut *tx, order_id)
            .await?;
        if items == 0 {
            return Err(AppError::DomainRule("cannot checkout an empty cart".into()));
        }

        let shipped = self
            .order_repo
            .set_status(&mut *tx, order_id, OrderStatus::Shipped)
            .await?;

        tx.commit().await?;
        tracing::info!("Order {} checked out with {} items", order_id, items);
        Ok(shipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppState, services::test_support as fx};
    use chrono::Utc;

    fn order_with(status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            date_of_order: Utc::now(),
            status,
            description: None,
            port_id: Uuid::new_v4(),
            client_id: None,
        }
    }

    #[test]
    fn only_pending_orders_are_modifiable() {
        assert!(ensure_modifiable(&order_with(OrderStatus::Pending)).is_ok());

        let err = ensure_modifiable(&order_with(OrderStatus::Shipped)).unwrap_err();
        assert_eq!(err.to_string(), "cannot modify a shipped order");

        let err = ensure_modifiable(&order_with(OrderStatus::Cancelled)).unwrap_err();
        assert_eq!(err.to_string(), "cannot modify a cancelled order");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn cart_flow_accumulates_then_locks_after_checkout(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).cart_service;
        let client = fx::client(&pool, "buyer").await;
        let port = fx::port(&pool, "P1").await;
        let product = fx::product(&pool, "X", Some(port)).await;

        let first = svc.add_to_cart(client, None, product, 2).await.unwrap();
        assert_eq!(first.order.status, OrderStatus::Pending);
        assert_eq!(first.order.port_id, port);
        assert_eq!(first.order.client_id, Some(client));
        let order_id = first.order.id;

        let second = svc.add_to_cart(client, Some(order_id), product, 3).await.unwrap();
        assert_eq!(second.item.quantity, 5);
        assert_eq!(svc.get_cart(order_id).await.unwrap().len(), 1);

        let shipped = svc.checkout(order_id).await.unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);

        let err = svc.add_to_cart(client, Some(order_id), product, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "cannot modify a shipped order");
        assert!(matches!(svc.checkout(order_id).await, Err(AppError::DomainRule(_))));
        assert!(matches!(svc.clear_cart(order_id).await, Err(AppError::DomainRule(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn overflowing_quantities_are_a_bad_request(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).cart_service;
        let client = fx::client(&pool, "buyer").await;
        let port = fx::port(&pool, "P1").await;
        let product = fx::product(&pool, "X", Some(port)).await;

        let first = svc.add_to_cart(client, None, product, 2_000_000_000).await.unwrap();
        let order_id = first.order.id;

        let err = svc
            .add_to_cart(client, Some(order_id), product, 2_000_000_000)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DomainRule(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        // A linha fica como estava
        let cart = svc.get_cart(order_id).await.unwrap();
        assert_eq!(cart[0].quantity, 2_000_000_000);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn empty_carts_cannot_be_checked_out_or_cleared(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).cart_service;
        let port = fx::port(&pool, "P1").await;
        let order = fx::order(&pool, port, OrderStatus::Pending).await;

        let err = svc.checkout(order).await.unwrap_err();
        assert!(matches!(err, AppError::DomainRule(_)));

        let err = svc.clear_cart(order).await.unwrap_err();
        assert_eq!(err.to_string(), "Cart is already empty");

        assert!(matches!(
            svc.remove_item(order, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn portless_products_need_a_default_port(pool: PgPool) {
        let client = fx::client(&pool, "buyer").await;
        let orphan = fx::product(&pool, "Orphan", None).await;

        let svc = AppState::from_pool(pool.clone(), fx::settings()).cart_service;
        let err = svc.add_to_cart(client, None, orphan, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "no port available for a new order");

        let fallback = fx::port(&pool, "Fallback").await;
        let mut settings = fx::settings();
        settings.default_port_id = Some(fallback);
        let svc = AppState::from_pool(pool.clone(), settings).cart_service;
        let cart = svc.add_to_cart(client, None, orphan, 1).await.unwrap();
        assert_eq!(cart.order.port_id, fallback);

        let err = svc.add_to_cart(client, None, Uuid::new_v4(), 1).await.unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn concurrent_add_and_checkout_serialize_on_the_order_row(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).cart_service;
        let client = fx::client(&pool, "buyer").await;
        let port = fx::port(&pool, "P1").await;
        let product = fx::product(&pool, "X", Some(port)).await;
        let order_id = svc.add_to_cart(client, None, product, 1).await.unwrap().order.id;

        let (added, checked_out) = tokio::join!(
            svc.add_to_cart(client, Some(order_id), product, 4),
            svc.checkout(order_id),
        );
        assert!(checked_out.is_ok());

        let quantity: i32 = sqlx::query_scalar(
            "SELECT quantity FROM orders_products WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_one(&pool)
        .await
        .unwrap();

        // Ou a adição entrou antes do checkout, ou foi recusada depois dele
        match added {
            Ok(cart) => assert_eq!(cart.item.quantity, 5),
            Err(e) => {
                assert!(matches!(e, AppError::DomainRule(_)));
                assert_eq!(quantity, 1);
            }
        }
    }
}
