// src/services/operation_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        operation_repo::NewOperation, OperationRepository, OrderRepository, PortRepository,
        ShipRepository,
    },
    models::operations::{
        CreateOperationPayload, Operation, OperationDetail, UpdateOperationPayload,
    },
};

fn none_found(scope: &str, id: Uuid) -> AppError {
    AppError::NotFound(format!("No operations found for {} with id: {}", scope, id))
}

fn non_empty(operations: Vec<Operation>, scope: &str, id: Uuid) -> Result<Vec<Operation>, AppError> {
    if operations.is_empty() {
        return Err(none_found(scope, id));
    }
    Ok(operations)
}

#[derive(Clone)]
pub struct OperationService {
    operation_repo: OperationRepository,
    ship_repo: ShipRepository,
    port_repo: PortRepository,
    order_repo: OrderRepository,
    pool: PgPool,
}

impl OperationService {
    pub fn new(
        operation_repo: OperationRepository,
        ship_repo: ShipRepository,
        port_repo: PortRepository,
        order_repo: OrderRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            operation_repo,
            ship_repo,
            port_repo,
            order_repo,
            pool,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Operation>, AppError> {
        self.operation_repo.list_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Operation, AppError> {
        self.operation_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Operation"))
    }

    pub async fn get_details(&self, id: Uuid) -> Result<OperationDetail, AppError> {
        self.operation_repo
            .find_details(id)
            .await?
            .ok_or_else(|| AppError::not_found("Operation"))
    }

    pub async fn list_by_port(&self, port_id: Uuid) -> Result<Vec<Operation>, AppError> {
        non_empty(self.operation_repo.list_by_port(port_id).await?, "port", port_id)
    }

    pub async fn list_by_ship(&self, ship_id: Uuid) -> Result<Vec<Operation>, AppError> {
        non_empty(self.operation_repo.list_by_ship(ship_id).await?, "ship", ship_id)
    }

    pub async fn list_by_order(&self, order_id: Uuid) -> Result<Vec<Operation>, AppError> {
        non_empty(self.operation_repo.list_by_order(order_id).await?, "order", order_id)
    }

    /// Registra uma operação: navio, porto e pedido precisam existir,
    /// e o mesmo (tipo, navio, porto, pedido) não pode se repetir.
    pub async fn create(&self, payload: &CreateOperationPayload) -> Result<Operation, AppError> {
        let pool = &self.pool;

        if !self.ship_repo.exists(pool, payload.ship_id).await? {
            return Err(AppError::not_found("Ship"));
        }
        if !self.port_repo.exists(pool, payload.port_id).await? {
            return Err(AppError::not_found("Port"));
        }
        if !self.order_repo.exists(pool, payload.order_id).await? {
            return Err(AppError::not_found("Order"));
        }

        if self
            .operation_repo
            .exists_duplicate(
                payload.operation_type,
                payload.ship_id,
                payload.port_id,
                payload.order_id,
            )
            .await?
        {
            return Err(AppError::Conflict(
                "An operation of this type already exists for this ship, port and order".into(),
            ));
        }

        let operation = self
            .operation_repo
            .create(&NewOperation {
                name: &payload.name,
                operation_type: payload.operation_type,
                date_of_operation: payload.date_of_operation,
                ship_id: payload.ship_id,
                port_id: payload.port_id,
                order_id: payload.order_id,
            })
            .await?;

        tracing::info!(
            "Operation {} ({:?}) registered for order {}",
            operation.id,
            operation.operation_type,
            operation.order_id
        );
        Ok(operation)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateOperationPayload,
    ) -> Result<Operation, AppError> {
        self.operation_repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("Operation"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Operation, AppError> {
        self.operation_repo
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Operation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppState,
        models::{operations::OperationType, orders::OrderStatus},
        services::test_support as fx,
    };

    #[test]
    fn empty_listings_name_the_scope() {
        let id = Uuid::nil();
        let err = non_empty(Vec::new(), "ship", id).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("No operations found for ship with id: {}", id)
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn duplicate_tuples_are_conflicts(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).operation_service;
        let port = fx::port(&pool, "P1").await;
        let ship = fx::ship(&pool, "S1").await;
        let order = fx::order(&pool, port, OrderStatus::Pending).await;

        let payload = CreateOperationPayload {
            name: "Load".into(),
            operation_type: OperationType::CargoLoading,
            date_of_operation: None,
            ship_id: ship,
            port_id: port,
            order_id: order,
        };
        let created = svc.create(&payload).await.unwrap();
        assert_eq!(created.operation_type, OperationType::CargoLoading);

        assert!(matches!(svc.create(&payload).await, Err(AppError::Conflict(_))));

        let details = svc.get_details(created.id).await.unwrap();
        assert_eq!(details.ship_name, "S1");
        assert_eq!(details.port_name, "P1");
        assert_eq!(svc.list_by_order(order).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn unknown_references_are_not_found(pool: PgPool) {
        let svc = AppState::from_pool(pool.clone(), fx::settings()).operation_service;
        let port = fx::port(&pool, "P1").await;
        let order = fx::order(&pool, port, OrderStatus::Pending).await;

        let payload = CreateOperationPayload {
            name: "Depart".into(),
            operation_type: OperationType::Departure,
            date_of_operation: None,
            ship_id: Uuid::new_v4(),
            port_id: port,
            order_id: order,
        };
        let err = svc.create(&payload).await.unwrap_err();
        assert_eq!(err.to_string(), "Ship not found");
        assert!(matches!(svc.list_by_port(port).await, Err(AppError::NotFound(_))));
    }
}
