// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, referenced_entity},
        error::AppError,
    },
    models::catalog::{CreateProductPayload, Product, UpdateProductPayload},
};

const PRODUCT_COLUMNS: &str = "id, name, price, weight, port_id, image IS NOT NULL AS has_image, created_at, updated_at";

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT {} FROM products ORDER BY name ASC", PRODUCT_COLUMNS);
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn list_by_port(&self, port_id: Uuid) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT {} FROM products WHERE port_id = $1 ORDER BY name ASC",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(port_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(executor)
                .await?;
        Ok(exists)
    }

    pub async fn create(&self, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO products (name, price, weight, port_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            PRODUCT_COLUMNS
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(&payload.name)
            .bind(payload.price)
            .bind(payload.weight)
            .bind(payload.port_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(e, |_| "Product already exists".into(), referenced_entity)
            })
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError> {
        let sql = format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                weight = COALESCE($4, weight),
                port_id = COALESCE($5, port_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(payload.name.as_deref())
            .bind(payload.price)
            .bind(payload.weight)
            .bind(payload.port_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(e, |_| "Product already exists".into(), referenced_entity)
            })
    }

    pub async fn set_image(&self, id: Uuid, image: &[u8]) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE products SET image = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(image)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `None` = produto inexistente; `Some(None)` = produto sem imagem.
    pub async fn find_image(&self, id: Uuid) -> Result<Option<Option<Vec<u8>>>, AppError> {
        let image: Option<Option<Vec<u8>>> =
            sqlx::query_scalar("SELECT image FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(image)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {}", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn delete_many<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM products WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
