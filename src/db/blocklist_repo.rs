// src/db/blocklist_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::auth::EmailBlockDomain};

// Domínios de e-mail descartáveis recusados no cadastro
#[derive(Clone)]
pub struct BlocklistRepository {
    pool: PgPool,
}

impl BlocklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<EmailBlockDomain>, AppError> {
        let domains = sqlx::query_as::<_, EmailBlockDomain>(
            "SELECT * FROM email_block_domains ORDER BY domain ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(domains)
    }

    pub async fn is_blocked<'e, E>(&self, executor: E, domain: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let blocked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM email_block_domains WHERE domain = $1)",
        )
        .bind(domain)
        .fetch_one(executor)
        .await?;
        Ok(blocked)
    }

    pub async fn delete_all<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM email_block_domains")
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // Espera a lista já normalizada (minúsculas, sem duplicatas)
    pub async fn insert_many<'e, E>(
        &self,
        executor: E,
        domains: &[String],
    ) -> Result<Vec<EmailBlockDomain>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, EmailBlockDomain>(
            r#"
            INSERT INTO email_block_domains (domain)
            SELECT * FROM UNNEST($1::varchar[])
            ON CONFLICT (domain) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(domains)
        .fetch_all(executor)
        .await?;
        Ok(inserted)
    }
}
