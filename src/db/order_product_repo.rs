// src/db/order_product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{is_out_of_range, map_constraint_error, referenced_entity},
        error::AppError,
    },
    models::orders::OrderProduct,
};

// Linhas de pedido (tabela orders_products)
#[derive(Clone)]
pub struct OrderProductRepository {
    pool: PgPool,
}

impl OrderProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<OrderProduct>, AppError> {
        let items = sqlx::query_as::<_, OrderProduct>(
            "SELECT * FROM orders_products ORDER BY order_id, product_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn find<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<OrderProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderProduct>(
            "SELECT * FROM orders_products WHERE order_id = $1 AND product_id = $2",
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn list_by_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<OrderProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderProduct>(
            "SELECT * FROM orders_products WHERE order_id = $1 ORDER BY product_id",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn list_by_product(&self, product_id: Uuid) -> Result<Vec<OrderProduct>, AppError> {
        let items = sqlx::query_as::<_, OrderProduct>(
            "SELECT * FROM orders_products WHERE product_id = $1 ORDER BY order_id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn count_by_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders_products WHERE order_id = $1")
                .bind(order_id)
                .fetch_one(executor)
                .await?;
        Ok(count)
    }

    /// Produtos que somem junto com o pedido encerrado.
    /// `exclusive_only` descarta os que ainda aparecem em outro pedido.
    pub async fn product_ids_for_purge<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        exclusive_only: bool,
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT op.product_id
            FROM orders_products op
            WHERE op.order_id = $1
              AND (
                  NOT $2
                  OR NOT EXISTS (
                      SELECT 1 FROM orders_products other
                      WHERE other.product_id = op.product_id
                        AND other.order_id <> $1
                  )
              )
            ORDER BY op.product_id
            "#,
        )
        .bind(order_id)
        .bind(exclusive_only)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    // ---
    // Escrita
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<OrderProduct, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrderProduct>(
            r#"
            INSERT INTO orders_products (order_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_constraint_error(
                e,
                |_| "This product is already part of the order".into(),
                referenced_entity,
            )
        })
    }

    /// Soma a quantidade à linha existente (nunca sobrescreve) ou cria a linha.
    pub async fn add_quantity<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<OrderProduct, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrderProduct>(
            r#"
            INSERT INTO orders_products (order_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (order_id, product_id)
            DO UPDATE SET quantity = orders_products.quantity + EXCLUDED.quantity
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // A soma passou do limite de INTEGER
            if is_out_of_range(&e) {
                return AppError::DomainRule("The accumulated quantity is too large.".into());
            }
            map_constraint_error(e, |_| "Duplicate line item".into(), referenced_entity)
        })
    }

    pub async fn update_quantity(
        &self,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Option<OrderProduct>, AppError> {
        let item = sqlx::query_as::<_, OrderProduct>(
            r#"
            UPDATE orders_products SET quantity = $3
            WHERE order_id = $1 AND product_id = $2
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<OrderProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderProduct>(
            "DELETE FROM orders_products WHERE order_id = $1 AND product_id = $2 RETURNING *",
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete_by_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM orders_products WHERE order_id = $1")
            .bind(order_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
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
        let result = sqlx::query("DELETE FROM orders_products WHERE order_id = ANY($1)")
            .bind(order_ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Linhas de OUTROS pedidos que apontam para os produtos informados.
    pub async fn delete_by_products_elsewhere<'e, E>(
        &self,
        executor: E,
        product_ids: &[Uuid],
        order_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if product_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "DELETE FROM orders_products WHERE product_id = ANY($1) AND order_id <> $2",
        )
        .bind(product_ids)
        .bind(order_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_products<'e, E>(
        &self,
        executor: E,
        product_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if product_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM orders_products WHERE product_id = ANY($1)")
            .bind(product_ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
