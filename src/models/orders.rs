// src/models/orders.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Pedidos encerrados levam seus produtos junto quando são excluídos.
    pub fn purges_products_on_delete(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Tabela de transições do modo estrito.
    /// PENDING -> SHIPPED -> DELIVERED, e PENDING/SHIPPED -> CANCELLED.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Shipped) | (Shipped, Delivered) | (Pending, Cancelled) | (Shipped, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Pedido ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub date_of_order: DateTime<Utc>,
    pub status: OrderStatus,
    #[schema(example = "Coffee shipment for Q3")]
    pub description: Option<String>,
    pub port_id: Uuid,
    pub client_id: Option<Uuid>,
}

// Linha do pedido (tabela orders_products), chave composta (order_id, product_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 5)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    pub id: Uuid,
    #[schema(example = "Customs clearance completed")]
    pub description: String,
    pub date: DateTime<Utc>,
    pub order_id: Uuid,
}

/// Teto por requisição para a quantidade de uma linha.
pub const MAX_LINE_QUANTITY: i32 = 1_000_000;

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    // Padrão: agora
    pub date_of_order: Option<DateTime<Utc>>,
    // Padrão: pending
    pub status: Option<OrderStatus>,
    #[validate(length(max = 2000, message = "The description is too long."))]
    pub description: Option<String>,
    pub port_id: Uuid,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub date_of_order: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    #[validate(length(max = 2000, message = "The description is too long."))]
    pub description: Option<String>,
    pub port_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
    // Sem pedido: um novo pedido PENDING é aberto para o cliente
    pub order_id: Option<Uuid>,
    pub product_id: Uuid,
    #[validate(range(min = 1, max = MAX_LINE_QUANTITY, message = "The quantity must be between 1 and 1000000."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderProductPayload {
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 1, max = MAX_LINE_QUANTITY, message = "The quantity must be between 1 and 1000000."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderProductPayload {
    #[validate(range(min = 1, max = MAX_LINE_QUANTITY, message = "The quantity must be between 1 and 1000000."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderHistoryPayload {
    #[validate(length(min = 1, max = 255, message = "The description must have 1 to 255 characters."))]
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub order_id: Uuid,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderHistoryPayload {
    #[validate(length(min = 1, max = 255, message = "The description must have 1 to 255 characters."))]
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

// --- Respostas compostas ---

/// Resultado da exclusão em cascata de um pedido.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedOrder {
    pub order: Order,
    // Só as linhas deste pedido
    pub removed_line_items: u64,
    // Linhas de outros pedidos removidas junto com os produtos compartilhados
    pub removed_shared_line_items: u64,
    pub removed_operations: u64,
    pub removed_products: Vec<Uuid>,
}

/// Resposta do carrinho: o pedido (talvez recém-criado) e a linha resultante.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub order: Order,
    pub item: OrderProduct,
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn only_closed_orders_purge_products() {
        assert!(!Pending.purges_products_on_delete());
        assert!(!Shipped.purges_products_on_delete());
        assert!(Delivered.purges_products_on_delete());
        assert!(Cancelled.purges_products_on_delete());
    }

    #[test]
    fn strict_table_follows_the_shipping_flow() {
        assert!(Pending.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Shipped.can_transition_to(Cancelled));
        assert!(Delivered.can_transition_to(Delivered));
    }

    #[test]
    fn strict_table_rejects_going_backwards_or_skipping() {
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Shipped));
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn cart_quantity_must_be_positive() {
        let payload = AddToCartPayload {
            order_id: None,
            product_id: Uuid::new_v4(),
            quantity: 0,
        };
        assert!(payload.validate().is_err());

        let payload: AddToCartPayload = serde_json::from_value(serde_json::json!({
            "productId": Uuid::nil(),
            "quantity": 2
        }))
        .unwrap();
        assert!(payload.order_id.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn cart_quantity_has_a_ceiling() {
        let payload = AddToCartPayload {
            order_id: None,
            product_id: Uuid::new_v4(),
            quantity: 2_000_000_000,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));

        let at_limit = AddToCartPayload {
            quantity: MAX_LINE_QUANTITY,
            ..payload
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn status_uses_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&Shipped).unwrap(), "\"shipped\"");
        let parsed: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, Cancelled);
    }
}
