// src/models/fleet.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Portos ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: Uuid,
    #[schema(example = "Port of Gdańsk")]
    pub name: String,
    #[schema(example = "Gdańsk")]
    pub location: String,
    #[schema(example = "Poland")]
    pub country: String,
    pub created_at: DateTime<Utc>,
}

// --- Navios ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ship_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum ShipStatus {
    Active,
    Inactive,
}

// A imagem (BYTEA) não entra aqui: é servida por rota própria
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub id: Uuid,
    #[schema(example = "MSC Gülsün")]
    pub name: String,
    #[schema(example = 23756)]
    pub capacity: i32,
    pub status: ShipStatus,
    pub has_image: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortPayload {
    #[validate(length(min = 1, message = "The port name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "The location is required."))]
    pub location: String,
    #[validate(length(min = 1, message = "The country is required."))]
    pub country: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortPayload {
    #[validate(length(min = 1, message = "The port name cannot be empty."))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "The location cannot be empty."))]
    pub location: Option<String>,
    #[validate(length(min = 1, message = "The country cannot be empty."))]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipPayload {
    #[validate(length(min = 1, message = "The ship name is required."))]
    pub name: String,
    #[validate(range(min = 1, message = "The capacity must be at least 1."))]
    pub capacity: i32,
    // Padrão: active
    pub status: Option<ShipStatus>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipPayload {
    #[validate(length(min = 1, message = "The ship name cannot be empty."))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "The capacity must be at least 1."))]
    pub capacity: Option<i32>,
    pub status: Option<ShipStatus>,
}

/// Upload de imagem em base64 (aceita também data URLs).
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImageUploadPayload {
    pub image: String,
}
