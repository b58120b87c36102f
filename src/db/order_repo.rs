// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, referenced_entity},
        error::AppError,
    },
    models::orders::{Order, OrderStatus, UpdateOrderPayload},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

/// Dados de um novo pedido (vindos do payload ou do carrinho).
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub date_of_order: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub description: Option<&'a str>,
    pub port_id: Uuid,
    pub client_id: Option<Uuid>,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_all(&self) -> Result<Vec<Order>, AppError> {
        let orders =
            sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY date_of_order DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(orders)
    }

    pub async fn list_by_port(&self, port_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE port_id = $1 ORDER BY date_of_order DESC",
        )
        .bind(port_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE client_id = $1 ORDER BY date_of_order DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    /// Igual a `find_by_id`, mas trava a linha até o fim da transação.
    /// Carrinho e checkout passam por aqui para não se atropelarem.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn ids_by_port<'e, E>(&self, executor: E, port_id: Uuid) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM orders WHERE port_id = $1")
            .bind(port_id)
            .fetch_all(executor)
            .await?;
        Ok(ids)
    }

    // ---
    // Escrita
    // ---

    pub async fn create<'e, E>(&self, executor: E, new_order: &NewOrder<'_>) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (date_of_order, status, description, port_id, client_id)
            VALUES (COALESCE($1, NOW()), $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new_order.date_of_order)
        .bind(new_order.status)
        .bind(new_order.description)
        .bind(new_order.port_id)
        .bind(new_order.client_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, |_| "Order already exists".into(), referenced_entity))
    }

    /// Atualização parcial. Ids de porto/cliente inexistentes são barrados pela FK (404).
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateOrderPayload,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET date_of_order = COALESCE($2, date_of_order),
                status = COALESCE($3, status),
                description = COALESCE($4, description),
                port_id = COALESCE($5, port_id),
                client_id = COALESCE($6, client_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.date_of_order)
        .bind(payload.status)
        .bind(payload.description.as_deref())
        .bind(payload.port_id)
        .bind(payload.client_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, |_| "Order already exists".into(), referenced_entity))
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order =
            sqlx::query_as::<_, Order>("UPDATE orders SET status = $2 WHERE id = $1 RETURNING *")
                .bind(id)
                .bind(status)
                .fetch_one(executor)
                .await?;
        Ok(order)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("DELETE FROM orders WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn delete_by_port<'e, E>(&self, executor: E, port_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM orders WHERE port_id = $1")
            .bind(port_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
