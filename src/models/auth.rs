// src/models/auth.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Guest,
    Client,
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "GUEST",
            Role::Client => "CLIENT",
            Role::Employee => "EMPLOYEE",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// A identidade única do sistema (clientes, funcionários e administradores)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[schema(example = "Baltic Trade Sp. z o.o.")]
    pub name: String,
    #[schema(example = "ul. Portowa 1, Gdańsk")]
    pub address: String,
    pub phone: Option<String>,
    #[schema(example = "contato@baltictrade.pl")]
    pub email: String,
    #[schema(example = "baltic")]
    pub logon_name: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de um novo cliente
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientPayload {
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "The address is required."))]
    pub address: String,
    #[validate(length(max = 32, message = "The phone number is too long."))]
    pub phone: Option<String>,
    #[validate(email(message = "The e-mail address is invalid."))]
    pub email: String,
    #[validate(length(min = 3, message = "The logon name must have at least 3 characters."))]
    pub logon_name: String,
    #[validate(length(min = 6, message = "The password must have at least 6 characters."))]
    pub password: String,
}

// Atualização parcial: só os campos enviados mudam
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, message = "The name cannot be empty."))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "The address cannot be empty."))]
    pub address: Option<String>,
    #[validate(length(max = 32, message = "The phone number is too long."))]
    pub phone: Option<String>,
    #[validate(email(message = "The e-mail address is invalid."))]
    pub email: Option<String>,
    #[validate(length(min = 3, message = "The logon name must have at least 3 characters."))]
    pub logon_name: Option<String>,
    #[validate(length(min = 6, message = "The password must have at least 6 characters."))]
    pub password: Option<String>,
    pub role: Option<Role>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Both login and password are required."))]
    pub logon_name: String,
    #[validate(length(min = 1, message = "Both login and password are required."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    pub client_id: Uuid,
    pub role: Role,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do cliente)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// --- Lista de domínios de e-mail bloqueados ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailBlockDomain {
    pub id: Uuid,
    #[schema(example = "mailinator.com")]
    pub domain: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceBlocklistPayload {
    #[schema(example = json!(["mailinator.com", "10minutemail.com"]))]
    pub domains: Vec<String>,
}

/// Normaliza a lista recebida: remove espaços, converte para minúsculas,
/// descarta linhas vazias e duplicadas (mantendo a ordem).
pub fn normalize_domains(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.iter()
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .filter(|d| seen.insert(d.clone()))
        .collect()
}

/// Domínio de um e-mail já validado ("a@B.com" -> "b.com").
pub fn email_domain(email: &str) -> Option<String> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim().to_lowercase())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_domains_trims_lowercases_and_dedups() {
        let raw = vec![
            " Mailinator.com ".to_string(),
            "".to_string(),
            "mailinator.com".to_string(),
            "10minutemail.com".to_string(),
            "   ".to_string(),
        ];
        assert_eq!(
            normalize_domains(&raw),
            vec!["mailinator.com".to_string(), "10minutemail.com".to_string()]
        );
    }

    #[test]
    fn email_domain_uses_last_at_sign() {
        assert_eq!(email_domain("ops@Harbour.PL"), Some("harbour.pl".to_string()));
        assert_eq!(email_domain("weird@name@example.com"), Some("example.com".to_string()));
        assert_eq!(email_domain("no-at-sign"), None);
        assert_eq!(email_domain("trailing@"), None);
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"EMPLOYEE\"");
        let parsed: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
