// src/services/cascade_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        OperationRepository, OrderHistoryRepository, OrderProductRepository, OrderRepository,
        PortRepository, ProductRepository, ShipRepository,
    },
    models::{catalog::Product, fleet::{Port, Ship}},
};

// Exclusões de Porto, Navio e Produto, cada uma numa única transação
#[derive(Clone)]
pub struct CascadeService {
    port_repo: PortRepository,
    ship_repo: ShipRepository,
    product_repo: ProductRepository,
    order_repo: OrderRepository,
    order_product_repo: OrderProductRepository,
    operation_repo: OperationRepository,
    order_history_repo: OrderHistoryRepository,
    pool: PgPool,
}

impl CascadeService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        port_repo: PortRepository,
        ship_repo: ShipRepository,
        product_repo: ProductRepository,
        order_repo: OrderRepository,
        order_product_repo: OrderProductRepository,
        operation_repo: OperationRepository,
        order_history_repo: OrderHistoryRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            port_repo,
            ship_repo,
            product_repo,
            order_repo,
            order_product_repo,
            operation_repo,
            order_history_repo,
            pool,
        }
    }

    /// Remove o porto com os seus pedidos (linhas, operações, histórico).
    /// Os produtos do porto continuam existindo, com port_id NULL.
    pub async fn delete_port(&self, port_id: Uuid) -> Result<Port, AppError> {
        let mut tx = self.pool.begin().await?;

        if self.port_repo.find_by_id(&mut *tx, port_id).await?.is_none() {
            return Err(AppError::not_found("Port"));
        }

        let order_ids = self.order_repo.ids_by_port(&mut *tx, port_id).await?;

        let line_items = self
            .order_product_repo
            .delete_by_orders(&mut *tx, &order_ids)
            .await?;
        let operations = self
            .operation_repo
            .delete_by_port_or_orders(&mut *tx, port_id, &order_ids)
            .await?;
        self.order_history_repo
            .delete_by_orders(&mut *tx, &order_ids)
            .await?;
        let orders = self.order_repo.delete_by_port(&mut *tx, port_id).await?;

        let port = self
            .port_repo
            .delete(&mut *tx, port_id)
            .await?
            .ok_or_else(|| AppError::not_found("Port"))?;

        tx.commit().await?;

        tracing::info!(
            "Port {} deleted ({} orders, {} line items, {} operations)",
            port_id,
            orders,
            line_items,
            operations
        );
        Ok(port)
    }

    pub async fn delete_ship(&self, ship_id: Uuid) -> Result<Ship, AppError> {
        let mut tx = self.pool.begin().await?;

        if !self.ship_repo.exists(&mut *tx, ship_id).await? {
            return Err(AppError::not_found("Ship"));
        }

        let operations = self.operation_repo.delete_by_ship(&mut *tx, ship_id).await?;
        let ship = self
            .ship_repo
            .delete(&mut *tx, ship_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ship"))?;

        tx.commit().await?;
        tracing::info!("Ship {} deleted ({} operations)", ship_id, operations);
        Ok(ship)
    }

    pub async fn delete_product(&self, product_id: Uuid) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        if !self.product_repo.exists(&mut *tx, product_id).await? {
            return Err(AppError::not_found("Product"));
        }

        let line_items = self
            .order_product_repo
            .delete_by_products(&mut *tx, &[product_id])
            .await?;
        let product = self
            .product_repo
            .delete(&mut *tx, product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))?;

        tx.commit().await?;
        tracing::info!("Product {} deleted ({} line items)", product_id, line_items);
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppState, models::orders::OrderStatus, services::test_support as fx};

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn deleting_a_port_removes_its_orders_and_operations(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).cascade_service;
        let doomed = fx::port(&pool, "Doomed").await;
        let other = fx::port(&pool, "Other").await;
        let ship = fx::ship(&pool, "S1").await;
        let product = fx::product(&pool, "Coffee", Some(doomed)).await;

        let order = fx::order(&pool, doomed, OrderStatus::Pending).await;
        fx::line_item(&pool, order, product, 1).await;
        fx::operation(&pool, ship, doomed, order).await;
        fx::history(&pool, order).await;

        // Operação de outro porto ligada a um pedido do porto excluído
        fx::operation(&pool, ship, other, order).await;
        // Pedido de outro porto com operação no porto excluído
        let foreign = fx::order(&pool, other, OrderStatus::Pending).await;
        fx::operation(&pool, ship, doomed, foreign).await;

        let port = svc.delete_port(doomed).await.unwrap();
        assert_eq!(port.id, doomed);

        let orders: i64 = fx::count(&pool, "SELECT COUNT(*) FROM orders WHERE port_id = $1", doomed).await;
        assert_eq!(orders, 0);
        let operations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(operations, 0);
        assert_eq!(fx::count(&pool, "SELECT COUNT(*) FROM orders WHERE id = $1", foreign).await, 1);

        let product_port: Option<Uuid> =
            sqlx::query_scalar("SELECT port_id FROM products WHERE id = $1")
                .bind(product)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(product_port, None);

        assert!(matches!(svc.delete_port(doomed).await, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn deleting_a_ship_or_product_clears_references_first(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).cascade_service;
        let port = fx::port(&pool, "P1").await;
        let ship = fx::ship(&pool, "S1").await;
        let product = fx::product(&pool, "Coffee", Some(port)).await;
        let order = fx::order(&pool, port, OrderStatus::Shipped).await;
        fx::line_item(&pool, order, product, 3).await;
        fx::operation(&pool, ship, port, order).await;

        svc.delete_ship(ship).await.unwrap();
        assert_eq!(
            fx::count(&pool, "SELECT COUNT(*) FROM operations WHERE order_id = $1", order).await,
            0
        );

        svc.delete_product(product).await.unwrap();
        assert_eq!(
            fx::count(&pool, "SELECT COUNT(*) FROM orders_products WHERE order_id = $1", order).await,
            0
        );
        assert_eq!(fx::count(&pool, "SELECT COUNT(*) FROM orders WHERE id = $1", order).await, 1);

        assert!(matches!(svc.delete_ship(ship).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.delete_product(product).await, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn a_failed_port_delete_leaves_everything_in_place(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).cascade_service;
        let port = fx::port(&pool, "P1").await;
        let ship = fx::ship(&pool, "S1").await;
        let product = fx::product(&pool, "Coffee", Some(port)).await;
        let order = fx::order(&pool, port, OrderStatus::Pending).await;
        fx::line_item(&pool, order, product, 1).await;
        fx::operation(&pool, ship, port, order).await;
        fx::history(&pool, order).await;

        fx::refuse_order_deletes(&pool).await;

        assert!(matches!(svc.delete_port(port).await, Err(AppError::DatabaseError(_))));

        assert_eq!(fx::count(&pool, "SELECT COUNT(*) FROM ports WHERE id = $1", port).await, 1);
        assert_eq!(fx::count(&pool, "SELECT COUNT(*) FROM orders WHERE id = $1", order).await, 1);
        assert_eq!(
            fx::count(&pool, "SELECT COUNT(*) FROM orders_products WHERE order_id = $1", order).await,
            1
        );
        assert_eq!(
            fx::count(&pool, "SELECT COUNT(*) FROM operations WHERE order_id = $1", order).await,
            1
        );
        assert_eq!(
            fx::count(&pool, "SELECT COUNT(*) FROM order_histories WHERE order_id = $1", order).await,
            1
        );
    }
}
