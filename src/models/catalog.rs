// src/models/catalog.rs

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Container 40ft - Coffee beans")]
    pub name: String,
    #[schema(example = "10.00")]
    pub price: Decimal,
    #[schema(example = "1250.500")]
    pub weight: Decimal,
    // Fica NULL quando o porto é excluído
    pub port_id: Option<Uuid>,
    pub has_image: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative")
            .with_message(Cow::Borrowed("The value cannot be negative.")));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "The product name is required."))]
    pub name: String,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub weight: Decimal,
    pub port_id: Uuid,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "The product name cannot be empty."))]
    pub name: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub weight: Option<Decimal>,
    pub port_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn negative_prices_and_weights_are_rejected() {
        let payload = CreateProductPayload {
            name: "Coffee".into(),
            price: Decimal::from_str("-0.01").unwrap(),
            weight: Decimal::from_str("-1").unwrap(),
            port_id: Uuid::new_v4(),
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("weight"));
    }

    #[test]
    fn zero_is_a_valid_price() {
        let payload = CreateProductPayload {
            name: "Sample".into(),
            price: Decimal::ZERO,
            weight: Decimal::from_str("12.5").unwrap(),
            port_id: Uuid::new_v4(),
        };
        assert!(payload.validate().is_ok());
        assert!(UpdateProductPayload::default().validate().is_ok());
    }
}
