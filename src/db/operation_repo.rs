// src/db/operation_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, referenced_entity},
        error::AppError,
    },
    models::operations::{Operation, OperationDetail, OperationType, UpdateOperationPayload},
};

#[derive(Clone)]
pub struct OperationRepository {
    pool: PgPool,
}

#[derive(Debug)]
pub struct NewOperation<'a> {
    pub name: &'a str,
    pub operation_type: OperationType,
    pub date_of_operation: Option<DateTime<Utc>>,
    pub ship_id: Uuid,
    pub port_id: Uuid,
    pub order_id: Uuid,
}

impl OperationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Operation>, AppError> {
        let operations = sqlx::query_as::<_, Operation>(
            "SELECT * FROM operations ORDER BY date_of_operation DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(operations)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>, AppError> {
        let operation = sqlx::query_as::<_, Operation>("SELECT * FROM operations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(operation)
    }

    /// Operação com os nomes do navio e do porto (JOIN).
    pub async fn find_details(&self, id: Uuid) -> Result<Option<OperationDetail>, AppError> {
        let detail = sqlx::query_as::<_, OperationDetail>(
            r#"
            SELECT o.id, o.name, o.operation_type, o.date_of_operation,
                   o.ship_id, s.name AS ship_name,
                   o.port_id, p.name AS port_name,
                   o.order_id
            FROM operations o
            JOIN ships s ON s.id = o.ship_id
            JOIN ports p ON p.id = o.port_id
            WHERE o.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(detail)
    }

    pub async fn list_by_port(&self, port_id: Uuid) -> Result<Vec<Operation>, AppError> {
        self.list_where("port_id", port_id).await
    }

    pub async fn list_by_ship(&self, ship_id: Uuid) -> Result<Vec<Operation>, AppError> {
        self.list_where("ship_id", ship_id).await
    }

    pub async fn list_by_order(&self, order_id: Uuid) -> Result<Vec<Operation>, AppError> {
        self.list_where("order_id", order_id).await
    }

    // `column` vem sempre de uma constante acima, nunca da requisição
    async fn list_where(&self, column: &'static str, id: Uuid) -> Result<Vec<Operation>, AppError> {
        let sql = format!(
            "SELECT * FROM operations WHERE {} = $1 ORDER BY date_of_operation DESC",
            column
        );
        let operations = sqlx::query_as::<_, Operation>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(operations)
    }

    /// Já existe uma operação com o mesmo (tipo, navio, porto, pedido)?
    pub async fn exists_duplicate(
        &self,
        operation_type: OperationType,
        ship_id: Uuid,
        port_id: Uuid,
        order_id: Uuid,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM operations
                WHERE operation_type = $1 AND ship_id = $2 AND port_id = $3 AND order_id = $4
            )
            "#,
        )
        .bind(operation_type)
        .bind(ship_id)
        .bind(port_id)
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(&self, new_operation: &NewOperation<'_>) -> Result<Operation, AppError> {
        sqlx::query_as::<_, Operation>(
            r#"
            INSERT INTO operations (name, operation_type, date_of_operation, ship_id, port_id, order_id)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new_operation.name)
        .bind(new_operation.operation_type)
        .bind(new_operation.date_of_operation)
        .bind(new_operation.ship_id)
        .bind(new_operation.port_id)
        .bind(new_operation.order_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_constraint_error(e, |_| "Operation already exists".into(), referenced_entity)
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateOperationPayload,
    ) -> Result<Option<Operation>, AppError> {
        sqlx::query_as::<_, Operation>(
            r#"
            UPDATE operations
            SET name = COALESCE($2, name),
                operation_type = COALESCE($3, operation_type),
                date_of_operation = COALESCE($4, date_of_operation),
                ship_id = COALESCE($5, ship_id),
                port_id = COALESCE($6, port_id),
                order_id = COALESCE($7, order_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref())
        .bind(payload.operation_type)
        .bind(payload.date_of_operation)
        .bind(payload.ship_id)
        .bind(payload.port_id)
        .bind(payload.order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_constraint_error(e, |_| "Operation already exists".into(), referenced_entity)
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<Operation>, AppError> {
        let operation =
            sqlx::query_as::<_, Operation>("DELETE FROM operations WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(operation)
    }

    // ---
    // Cascatas (sempre dentro de uma transação aberta pelo serviço)
    // ---

    pub async fn delete_by_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM operations WHERE order_id = $1")
            .bind(order_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Operações do porto ou de qualquer um dos pedidos informados.
    pub async fn delete_by_port_or_orders<'e, E>(
        &self,
        executor: E,
        port_id: Uuid,
        order_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM operations WHERE port_id = $1 OR order_id = ANY($2)")
            .bind(port_id)
            .bind(order_ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_ship<'e, E>(&self, executor: E, ship_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM operations WHERE ship_id = $1")
            .bind(ship_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
