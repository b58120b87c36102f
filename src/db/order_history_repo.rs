// src/db/order_history_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, referenced_entity},
        error::AppError,
    },
    models::orders::{CreateOrderHistoryPayload, OrderHistory, UpdateOrderHistoryPayload},
};

#[derive(Clone)]
pub struct OrderHistoryRepository {
    pool: PgPool,
}

impl OrderHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<OrderHistory>, AppError> {
        let entries =
            sqlx::query_as::<_, OrderHistory>("SELECT * FROM order_histories ORDER BY date DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(entries)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderHistory>, AppError> {
        let entry =
            sqlx::query_as::<_, OrderHistory>("SELECT * FROM order_histories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(entry)
    }

    pub async fn create(
        &self,
        payload: &CreateOrderHistoryPayload,
    ) -> Result<OrderHistory, AppError> {
        sqlx::query_as::<_, OrderHistory>(
            r#"
            INSERT INTO order_histories (description, date, order_id)
            VALUES ($1, COALESCE($2, NOW()), $3)
            RETURNING *
            "#,
        )
        .bind(&payload.description)
        .bind(payload.date)
        .bind(payload.order_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, |_| "History entry already exists".into(), referenced_entity))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateOrderHistoryPayload,
    ) -> Result<Option<OrderHistory>, AppError> {
        let entry = sqlx::query_as::<_, OrderHistory>(
            r#"
            UPDATE order_histories
            SET description = COALESCE($2, description),
                date = COALESCE($3, date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.description.as_deref())
        .bind(payload.date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<OrderHistory>, AppError> {
        let entry = sqlx::query_as::<_, OrderHistory>(
            "DELETE FROM order_histories WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn delete_by_orders<'e, E>(
        &self,
        executor: E,
        order_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if order_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM order_histories WHERE order_id = ANY($1)")
            .bind(order_ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
