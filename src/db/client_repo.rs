// src/db/client_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Client, Role},
};

// O repositório de clientes, responsável por todas as interações com a tabela 'clients'
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

/// Campos de uma atualização parcial (None = mantém o valor atual).
#[derive(Debug, Default)]
pub struct ClientChanges<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub logon_name: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role: Option<Role>,
}

fn map_client_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("clients_email_key") => AppError::Conflict("Email already exists".into()),
                Some("clients_logon_name_key") => {
                    AppError::Conflict("Logon name already exists".into())
                }
                // Fallback (caso adicione outras chaves únicas no futuro)
                other => AppError::Conflict(format!(
                    "Unique constraint violated: {}",
                    other.unwrap_or("unknown")
                )),
            };
        }
    }
    e.into()
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um cliente pelo nome de login
    pub async fn find_by_logon_name(&self, logon_name: &str) -> Result<Option<Client>, AppError> {
        let maybe_client =
            sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE logon_name = $1")
                .bind(logon_name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_client)
    }

    // Busca um cliente pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let maybe_client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_client)
    }

    pub async fn list_all(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(clients)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    // Cria um novo cliente, com tratamento específico para login/e-mail duplicados.
    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        name: &str,
        address: &str,
        phone: Option<&str>,
        email: &str,
        logon_name: &str,
        password_hash: &str,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, address, phone, email, logon_name, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(email)
        .bind(logon_name)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(map_client_write_error)
    }

    pub async fn update_client(
        &self,
        id: Uuid,
        changes: &ClientChanges<'_>,
    ) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                logon_name = COALESCE($6, logon_name),
                password_hash = COALESCE($7, password_hash),
                role = COALESCE($8, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.address)
        .bind(changes.phone)
        .bind(changes.email)
        .bind(changes.logon_name)
        .bind(changes.password_hash)
        .bind(changes.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_client_write_error)
    }

    // Os pedidos do cliente ficam com client_id NULL (ON DELETE SET NULL)
    pub async fn delete_client(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let deleted = sqlx::query_as::<_, Client>("DELETE FROM clients WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted)
    }
}
