// src/models/operations.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "operation_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    AtBay, // navio parado, sem operação (padrão)
    Transport,
    Transfer,
    Departure,
    Arrival,
    CargoLoading,
    CargoDischarge,
}

impl Default for OperationType {
    fn default() -> Self {
        OperationType::AtBay
    }
}

// --- Evento logístico: liga Navio, Porto e Pedido ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: Uuid,
    #[schema(example = "Unload coffee containers")]
    pub name: String,
    pub operation_type: OperationType,
    pub date_of_operation: DateTime<Utc>,
    pub ship_id: Uuid,
    pub port_id: Uuid,
    pub order_id: Uuid,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationDetail {
    pub id: Uuid,
    pub name: String,
    pub operation_type: OperationType,
    pub date_of_operation: DateTime<Utc>,
    pub ship_id: Uuid,
    pub ship_name: String,
    pub port_id: Uuid,
    pub port_name: String,
    pub order_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationPayload {
    #[validate(length(min = 1, message = "The operation name is required."))]
    pub name: String,
    #[serde(default)]
    pub operation_type: OperationType,
    // Padrão: agora
    pub date_of_operation: Option<DateTime<Utc>>,
    pub ship_id: Uuid,
    pub port_id: Uuid,
    pub order_id: Uuid,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperationPayload {
    #[validate(length(min = 1, message = "The operation name cannot be empty."))]
    pub name: Option<String>,
    pub operation_type: Option<OperationType>,
    pub date_of_operation: Option<DateTime<Utc>>,
    pub ship_id: Option<Uuid>,
    pub port_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&OperationType::CargoDischarge).unwrap(),
            "\"CARGO_DISCHARGE\""
        );
        let parsed: OperationType = serde_json::from_str("\"AT_BAY\"").unwrap();
        assert_eq!(parsed, OperationType::default());
    }

    #[test]
    fn missing_operation_type_defaults_to_at_bay() {
        let payload: CreateOperationPayload = serde_json::from_value(serde_json::json!({
            "name": "Wait for berth",
            "shipId": Uuid::nil(),
            "portId": Uuid::nil(),
            "orderId": Uuid::nil()
        }))
        .unwrap();
        assert_eq!(payload.operation_type, OperationType::AtBay);
        assert!(payload.date_of_operation.is_none());
    }
}
