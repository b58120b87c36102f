// src/config.rs

use std::{env, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::{
        BlocklistRepository, ClientRepository, OperationRepository, OrderHistoryRepository,
        OrderProductRepository, OrderRepository, PortRepository, ProductRepository,
        ShipRepository,
    },
    services::{
        auth::AuthService, cart_service::CartService, cascade_service::CascadeService,
        operation_service::OperationService, order_service::OrderService,
    },
};

/// Como o serviço de pedidos trata mudanças de status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Aceita qualquer status (comportamento histórico).
    Lenient,
    /// Só permite o fluxo PENDING -> SHIPPED -> DELIVERED / CANCELLED.
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(TransitionPolicy::Lenient),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(anyhow!("expected 'lenient' or 'strict', got '{}'", other)),
        }
    }
}

/// Quais produtos somem junto com um pedido DELIVERED/CANCELLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductPurgeScope {
    /// Todos os produtos do pedido, mesmo que outros pedidos ainda os referenciem.
    Legacy,
    /// Apenas produtos que nenhum outro pedido referencia.
    Exclusive,
}

impl FromStr for ProductPurgeScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(ProductPurgeScope::Legacy),
            "exclusive" => Ok(ProductPurgeScope::Exclusive),
            other => Err(anyhow!("expected 'legacy' or 'exclusive', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub default_port_id: Option<Uuid>,
    pub transition_policy: TransitionPolicy,
    pub product_purge_scope: ProductPurgeScope,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Lê a configuração de qualquer fonte chave/valor (o ambiente, ou um mapa nos testes).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        fn parsed<T>(lookup: &dyn Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
        where
            T: FromStr,
            T::Err: std::fmt::Display,
        {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(raw) => raw
                    .trim()
                    .parse::<T>()
                    .map_err(|e| anyhow!("invalid value for {}: {}", key, e)),
                None => Ok(default),
            }
        }

        let default_port_id = match lookup("DEFAULT_PORT_ID").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                Uuid::parse_str(raw.trim()).context("DEFAULT_PORT_ID must be a UUID")?,
            ),
            None => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: parsed(&lookup, "JWT_TTL_HOURS", 24 * 7)?,
            bind_addr: parsed(&lookup, "BIND_ADDR", "0.0.0.0:3000".to_string())?,
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            default_port_id,
            transition_policy: parsed(&lookup, "ORDER_TRANSITIONS", TransitionPolicy::Lenient)?,
            product_purge_scope: parsed(&lookup, "PRODUCT_PURGE_SCOPE", ProductPurgeScope::Legacy)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,

    // Repositórios usados diretamente pelos handlers de CRUD simples
    pub client_repo: ClientRepository,
    pub port_repo: PortRepository,
    pub ship_repo: ShipRepository,
    pub product_repo: ProductRepository,
    pub order_repo: OrderRepository,
    pub order_product_repo: OrderProductRepository,
    pub operation_repo: OperationRepository,
    pub order_history_repo: OrderHistoryRepository,

    // Serviços (regras de negócio e transações)
    pub auth_service: AuthService,
    pub order_service: OrderService,
    pub cart_service: CartService,
    pub cascade_service: CascadeService,
    pub operation_service: OperationService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Failed to connect to the database")?;

        tracing::info!("✅ Database connection established");

        Ok(Self::from_pool(db_pool, settings))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, settings: Settings) -> Self {
        let client_repo = ClientRepository::new(db_pool.clone());
        let port_repo = PortRepository::new(db_pool.clone());
        let ship_repo = ShipRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let order_product_repo = OrderProductRepository::new(db_pool.clone());
        let operation_repo = OperationRepository::new(db_pool.clone());
        let order_history_repo = OrderHistoryRepository::new(db_pool.clone());
        let blocklist_repo = BlocklistRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            client_repo.clone(),
            blocklist_repo,
            settings.jwt_secret.clone(),
            settings.jwt_ttl_hours,
            db_pool.clone(),
        );
        let order_service = OrderService::new(
            order_repo.clone(),
            order_product_repo.clone(),
            operation_repo.clone(),
            order_history_repo.clone(),
            port_repo.clone(),
            product_repo.clone(),
            client_repo.clone(),
            settings.transition_policy,
            settings.product_purge_scope,
            db_pool.clone(),
        );
        let cart_service = CartService::new(
            order_repo.clone(),
            order_product_repo.clone(),
            product_repo.clone(),
            settings.default_port_id,
            db_pool.clone(),
        );
        let cascade_service = CascadeService::new(
            port_repo.clone(),
            ship_repo.clone(),
            product_repo.clone(),
            order_repo.clone(),
            order_product_repo.clone(),
            operation_repo.clone(),
            order_history_repo.clone(),
            db_pool.clone(),
        );
        let operation_service = OperationService::new(
            operation_repo.clone(),
            ship_repo.clone(),
            port_repo.clone(),
            order_repo.clone(),
            db_pool.clone(),
        );

        Self {
            db_pool,
            settings,
            client_repo,
            port_repo,
            ship_repo,
            product_repo,
            order_repo,
            order_product_repo,
            operation_repo,
            order_history_repo,
            auth_service,
            order_service,
            cart_service,
            cascade_service,
            operation_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/ports"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(settings.jwt_ttl_hours, 168);
        assert_eq!(settings.bind_addr, "0.0.0.0:3000");
        assert_eq!(settings.db_max_connections, 5);
        assert_eq!(settings.default_port_id, None);
        assert_eq!(settings.transition_policy, TransitionPolicy::Lenient);
        assert_eq!(settings.product_purge_scope, ProductPurgeScope::Legacy);
    }

    #[test]
    fn optional_keys_are_parsed() {
        let port = Uuid::new_v4();
        let port_str = port.to_string();
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/ports"),
            ("JWT_SECRET", "secret"),
            ("DEFAULT_PORT_ID", port_str.as_str()),
            ("ORDER_TRANSITIONS", "Strict"),
            ("PRODUCT_PURGE_SCOPE", "exclusive"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(settings.default_port_id, Some(port));
        assert_eq!(settings.transition_policy, TransitionPolicy::Strict);
        assert_eq!(settings.product_purge_scope, ProductPurgeScope::Exclusive);
        assert_eq!(settings.db_max_connections, 12);
    }

    #[test]
    fn missing_secret_and_bad_values_are_reported_by_name() {
        let err = Settings::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let err = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("ORDER_TRANSITIONS", "whatever"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ORDER_TRANSITIONS"));
    }
}
