// src/db/ship_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::fleet::{CreateShipPayload, Ship, ShipStatus, UpdateShipPayload},
};

// A coluna `image` nunca é carregada nas listagens, só a flag
const SHIP_COLUMNS: &str =
    "id, name, capacity, status, image IS NOT NULL AS has_image, created_at, updated_at";

#[derive(Clone)]
pub struct ShipRepository {
    pool: PgPool,
}

impl ShipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Ship>, AppError> {
        let sql = format!("SELECT {} FROM ships ORDER BY name ASC", SHIP_COLUMNS);
        let ships = sqlx::query_as::<_, Ship>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(ships)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Ship>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM ships WHERE id = $1", SHIP_COLUMNS);
        let ship = sqlx::query_as::<_, Ship>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(ship)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM ships WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, payload: &CreateShipPayload) -> Result<Ship, AppError> {
        let sql = format!(
            "INSERT INTO ships (name, capacity, status) VALUES ($1, $2, $3) RETURNING {}",
            SHIP_COLUMNS
        );
        let ship = sqlx::query_as::<_, Ship>(&sql)
            .bind(&payload.name)
            .bind(payload.capacity)
            .bind(payload.status.unwrap_or(ShipStatus::Active))
            .fetch_one(&self.pool)
            .await?;
        Ok(ship)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateShipPayload,
    ) -> Result<Option<Ship>, AppError> {
        let sql = format!(
            r#"
            UPDATE ships
            SET name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SHIP_COLUMNS
        );
        let ship = sqlx::query_as::<_, Ship>(&sql)
            .bind(id)
            .bind(payload.name.as_deref())
            .bind(payload.capacity)
            .bind(payload.status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ship)
    }

    /// Grava a imagem; retorna false se o navio não existe.
    pub async fn set_image(&self, id: Uuid, image: &[u8]) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE ships SET image = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(image)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `None` = navio inexistente; `Some(None)` = navio sem imagem.
    pub async fn find_image(&self, id: Uuid) -> Result<Option<Option<Vec<u8>>>, AppError> {
        let image: Option<Option<Vec<u8>>> =
            sqlx::query_scalar("SELECT image FROM ships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(image)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Ship>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("DELETE FROM ships WHERE id = $1 RETURNING {}", SHIP_COLUMNS);
        let ship = sqlx::query_as::<_, Ship>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(ship)
    }
}
