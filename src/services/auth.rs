// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{client_repo::ClientChanges, BlocklistRepository, ClientRepository},
    models::auth::{
        email_domain, normalize_domains, AuthResponse, Claims, Client, EmailBlockDomain,
        RegisterClientPayload, UpdateClientPayload,
    },
};

#[derive(Clone)]
pub struct AuthService {
    client_repo: ClientRepository,
    blocklist_repo: BlocklistRepository,
    jwt_secret: String,
    jwt_ttl_hours: i64,
    pool: PgPool,
}

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Hashing task failed: {}", e))??;
    Ok(hashed)
}

impl AuthService {
    pub fn new(
        client_repo: ClientRepository,
        blocklist_repo: BlocklistRepository,
        jwt_secret: String,
        jwt_ttl_hours: i64,
        pool: PgPool,
    ) -> Self {
        Self {
            client_repo,
            blocklist_repo,
            jwt_secret,
            jwt_ttl_hours,
            pool,
        }
    }

    async fn ensure_domain_allowed<'e, E>(&self, executor: E, email: &str) -> Result<(), AppError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let Some(domain) = email_domain(email) else {
            return Err(AppError::InvalidInput("The e-mail address is invalid.".into()));
        };
        if self.blocklist_repo.is_blocked(executor, &domain).await? {
            tracing::warn!("Registration refused for blocked domain {}", domain);
            return Err(AppError::InvalidInput(format!(
                "E-mail addresses from '{}' are not accepted.",
                domain
            )));
        }
        Ok(())
    }

    /// Cadastra um cliente (role CLIENT).
    pub async fn register_client(
        &self,
        payload: &RegisterClientPayload,
    ) -> Result<Client, AppError> {
        // 1. Hashing fora da transação, não toca no banco
        let hashed_password = hash_password(&payload.password).await?;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 2. Domínio bloqueado? (mesma transação da inserção)
        self.ensure_domain_allowed(&mut *tx, &payload.email).await?;

        // 3. Cria o cliente; login/e-mail duplicados viram 409
        let client = self
            .client_repo
            .create_client(
                &mut *tx,
                &payload.name,
                &payload.address,
                payload.phone.as_deref(),
                &payload.email,
                &payload.logon_name,
                &hashed_password,
            )
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!("Client {} registered as {}", client.id, client.logon_name);
        Ok(client)
    }

    pub async fn login(&self, logon_name: &str, password: &str) -> Result<AuthResponse, AppError> {
        let client = self
            .client_repo
            .find_by_logon_name(logon_name)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = client.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        Ok(AuthResponse {
            token: self.create_token(client.id)?,
            token_type: "bearer".to_string(),
            client_id: client.id,
            role: client.role,
        })
    }

    /// Valida o token e recarrega o cliente (mudanças de role valem na hora).
    pub async fn validate_token(&self, token: &str) -> Result<Client, AppError> {
        let claims = self.decode_claims(token)?;

        self.client_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub async fn update_client(
        &self,
        id: Uuid,
        payload: &UpdateClientPayload,
    ) -> Result<Client, AppError> {
        if let Some(email) = payload.email.as_deref() {
            self.ensure_domain_allowed(&self.pool, email).await?;
        }

        let password_hash = match payload.password.as_deref() {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let changes = ClientChanges {
            name: payload.name.as_deref(),
            address: payload.address.as_deref(),
            phone: payload.phone.as_deref(),
            email: payload.email.as_deref(),
            logon_name: payload.logon_name.as_deref(),
            password_hash: password_hash.as_deref(),
            role: payload.role,
        };

        self.client_repo
            .update_client(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("Client"))
    }

    pub async fn list_blocklist(&self) -> Result<Vec<EmailBlockDomain>, AppError> {
        self.blocklist_repo.list_all().await
    }

    /// Substitui a lista inteira de domínios bloqueados numa única transação.
    pub async fn replace_blocklist(
        &self,
        raw_domains: &[String],
    ) -> Result<Vec<EmailBlockDomain>, AppError> {
        let domains = normalize_domains(raw_domains);

        let mut tx = self.pool.begin().await?;
        let removed = self.blocklist_repo.delete_all(&mut *tx).await?;
        let mut inserted = self.blocklist_repo.insert_many(&mut *tx, &domains).await?;
        tx.commit().await?;

        tracing::info!(
            "E-mail blocklist replaced: {} removed, {} inserted",
            removed,
            inserted.len()
        );
        inserted.sort_by(|a, b| a.domain.cmp(&b.domain));
        Ok(inserted)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(token_data.claims)
    }

    fn create_token(&self, client_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.jwt_ttl_hours);

        let claims = Claims {
            sub: client_id,
            exp: expires_at.timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service(ttl_hours: i64) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(
            ClientRepository::new(pool.clone()),
            BlocklistRepository::new(pool.clone()),
            "test-secret".to_string(),
            ttl_hours,
            pool,
        )
    }

    #[tokio::test]
    async fn issued_tokens_carry_the_client_id() {
        let svc = service(1);
        let id = Uuid::new_v4();
        let token = svc.create_token(id).unwrap();

        let claims = svc.decode_claims(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn tokens_signed_with_another_secret_are_rejected() {
        let svc = service(1);
        let mut other = service(1);
        other.jwt_secret = "another-secret".to_string();

        let token = other.create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(svc.decode_claims(&token), Err(AppError::InvalidToken)));
        assert!(matches!(svc.decode_claims("not-a-jwt"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        let svc = service(-2);
        let token = svc.create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(svc.decode_claims(&token), Err(AppError::InvalidToken)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn register_then_login(pool: PgPool) {
        let svc = AuthService::new(
            ClientRepository::new(pool.clone()),
            BlocklistRepository::new(pool.clone()),
            "test-secret".into(),
            1,
            pool.clone(),
        );
        let payload = RegisterClientPayload {
            name: "Baltic Trade".into(),
            address: "ul. Portowa 1".into(),
            phone: None,
            email: "ops@baltic.pl".into(),
            logon_name: "baltic".into(),
            password: "s3cret!".into(),
        };

        let client = svc.register_client(&payload).await.unwrap();
        assert_eq!(client.role, crate::models::auth::Role::Client);

        // Mesmo login de novo: 409
        assert!(matches!(svc.register_client(&payload).await, Err(AppError::Conflict(_))));

        let auth = svc.login("baltic", "s3cret!").await.unwrap();
        assert_eq!(auth.client_id, client.id);
        assert_eq!(svc.validate_token(&auth.token).await.unwrap().id, client.id);

        assert!(matches!(svc.login("baltic", "wrong").await, Err(AppError::InvalidCredentials)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn blocked_domains_cannot_register(pool: PgPool) {
        let svc = AuthService::new(
            ClientRepository::new(pool.clone()),
            BlocklistRepository::new(pool.clone()),
            "test-secret".into(),
            1,
            pool.clone(),
        );
        let stored = svc
            .replace_blocklist(&[" Mailinator.com ".to_string(), "".to_string()])
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].domain, "mailinator.com");

        let payload = RegisterClientPayload {
            name: "Throwaway".into(),
            address: "Nowhere".into(),
            phone: None,
            email: "someone@MAILINATOR.com".into(),
            logon_name: "throwaway".into(),
            password: "123456".into(),
        };
        assert!(matches!(
            svc.register_client(&payload).await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
