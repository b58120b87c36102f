// src/services/order_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::{ProductPurgeScope, TransitionPolicy},
    db::{
        order_repo::NewOrder, ClientRepository, OperationRepository, OrderHistoryRepository,
        OrderProductRepository, OrderRepository, PortRepository, ProductRepository,
    },
    models::orders::{CreateOrderPayload, DeletedOrder, Order, OrderStatus, UpdateOrderPayload},
};

/// Aplica a política de transição configurada.
pub fn check_transition(
    policy: TransitionPolicy,
    current: OrderStatus,
    next: OrderStatus,
) -> Result<(), AppError> {
    match policy {
        TransitionPolicy::Lenient => Ok(()),
        TransitionPolicy::Strict if current.can_transition_to(next) => Ok(()),
        TransitionPolicy::Strict => Err(AppError::DomainRule(format!(
            "cannot change a {} order to {}",
            current, next
        ))),
    }
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    order_product_repo: OrderProductRepository,
    operation_repo: OperationRepository,
    order_history_repo: OrderHistoryRepository,
    port_repo: PortRepository,
    product_repo: ProductRepository,
    client_repo: ClientRepository,
    transition_policy: TransitionPolicy,
    product_purge_scope: ProductPurgeScope,
    pool: PgPool,
}

impl OrderService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_repo: OrderRepository,
        order_product_repo: OrderProductRepository,
        operation_repo: OperationRepository,
        order_history_repo: OrderHistoryRepository,
        port_repo: PortRepository,
        product_repo: ProductRepository,
        client_repo: ClientRepository,
        transition_policy: TransitionPolicy,
        product_purge_scope: ProductPurgeScope,
        pool: PgPool,
    ) -> Self {
        Self {
            order_repo,
            order_product_repo,
            operation_repo,
            order_history_repo,
            port_repo,
            product_repo,
            client_repo,
            transition_policy,
            product_purge_scope,
            pool,
        }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_all(&self) -> Result<Vec<Order>, AppError> {
        self.order_repo.list_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Order, AppError> {
        self.order_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))
    }

    pub async fn list_by_port(&self, port_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = self.order_repo.list_by_port(port_id).await?;
        if orders.is_empty() {
            return Err(AppError::NotFound(format!(
                "No orders found for port with id: {}",
                port_id
            )));
        }
        Ok(orders)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = self.order_repo.list_by_client(client_id).await?;
        if orders.is_empty() {
            return Err(AppError::NotFound(format!(
                "No orders found for client with id: {}",
                client_id
            )));
        }
        Ok(orders)
    }

    // ---
    // Escrita
    // ---

    pub async fn create(&self, payload: &CreateOrderPayload) -> Result<Order, AppError> {
        if !self.port_repo.exists(&self.pool, payload.port_id).await? {
            return Err(AppError::not_found("Port"));
        }
        if let Some(client_id) = payload.client_id {
            if !self.client_repo.exists(&self.pool, client_id).await? {
                return Err(AppError::not_found("Client"));
            }
        }

        let order = self
            .order_repo
            .create(
                &self.pool,
                &NewOrder {
                    date_of_order: payload.date_of_order,
                    status: payload.status.unwrap_or(OrderStatus::Pending),
                    description: payload.description.as_deref(),
                    port_id: payload.port_id,
                    client_id: payload.client_id,
                },
            )
            .await?;

        tracing::info!("Order {} created at port {}", order.id, order.port_id);
        Ok(order)
    }

    /// Atualização parcial. Porto/cliente novos não são conferidos aqui: a FK responde 404.
    pub async fn update(&self, id: Uuid, payload: &UpdateOrderPayload) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .order_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;

        if let Some(next) = payload.status {
            check_transition(self.transition_policy, current.status, next)?;
        }

        let updated = self
            .order_repo
            .update(&mut *tx, id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;

        tx.commit().await?;

        if updated.status != current.status {
            tracing::info!(
                "Order {} moved from {} to {}",
                id,
                current.status,
                updated.status
            );
        }
        Ok(updated)
    }

    /// Exclusão em cascata de um pedido, tudo ou nada.
    ///
    /// Pedidos DELIVERED/CANCELLED levam junto os produtos das suas linhas
    /// (e as linhas de outros pedidos que apontam para esses produtos).
    pub async fn delete(&self, id: Uuid) -> Result<DeletedOrder, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;

        let mut removed_shared_line_items = 0;
        let mut removed_products = Vec::new();

        // 1. Produtos do pedido encerrado: primeiro saem as linhas de outros pedidos
        if order.status.purges_products_on_delete() {
            let exclusive_only = self.product_purge_scope == ProductPurgeScope::Exclusive;
            removed_products = self
                .order_product_repo
                .product_ids_for_purge(&mut *tx, id, exclusive_only)
                .await?;

            removed_shared_line_items = self
                .order_product_repo
                .delete_by_products_elsewhere(&mut *tx, &removed_products, id)
                .await?;
        }

        // 2. Linhas do pedido (antes dos produtos, por causa da FK)
        let removed_line_items = self.order_product_repo.delete_by_order(&mut *tx, id).await?;
        self.product_repo.delete_many(&mut *tx, &removed_products).await?;

        // 3. Operações
        let removed_operations = self.operation_repo.delete_by_order(&mut *tx, id).await?;

        // 4. Histórico (FK)
        self.order_history_repo.delete_by_orders(&mut *tx, &[id]).await?;

        // 5. O pedido
        let order = self
            .order_repo
            .delete(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;

        tx.commit().await?;

        tracing::info!(
            "Order {} deleted ({} line items, {} from other orders, {} operations, {} products)",
            id,
            removed_line_items,
            removed_shared_line_items,
            removed_operations,
            removed_products.len()
        );

        Ok(DeletedOrder {
            order,
            removed_line_items,
            removed_shared_line_items,
            removed_operations,
            removed_products,
        })
    }
}
