// src/db/port_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::fleet::{CreatePortPayload, Port, UpdatePortPayload},
};

#[derive(Clone)]
pub struct PortRepository {
    pool: PgPool,
}

impl PortRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Port>, AppError> {
        let ports = sqlx::query_as::<_, Port>("SELECT * FROM ports ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(ports)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Port>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let port = sqlx::query_as::<_, Port>("SELECT * FROM ports WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(port)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM ports WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, payload: &CreatePortPayload) -> Result<Port, AppError> {
        let port = sqlx::query_as::<_, Port>(
            r#"
            INSERT INTO ports (name, location, country)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.location)
        .bind(&payload.country)
        .fetch_one(&self.pool)
        .await?;
        Ok(port)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdatePortPayload,
    ) -> Result<Option<Port>, AppError> {
        let port = sqlx::query_as::<_, Port>(
            r#"
            UPDATE ports
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                country = COALESCE($4, country)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref())
        .bind(payload.location.as_deref())
        .bind(payload.country.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(port)
    }

    // Último passo da cascata: os produtos do porto ficam com port_id NULL (FK)
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Port>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let port = sqlx::query_as::<_, Port>("DELETE FROM ports WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(port)
    }
}
