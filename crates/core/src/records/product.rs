//! Product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row in the `products` table. Read-only from the handlers' perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Percentage discount; the sheet may hold a number, a numeric string,
    /// or junk. Interpreted by `pricing::parse_discount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_discount: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tolerates_string_discount() {
        let product: Product = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Trail Runner",
            "price": 100.0,
            "current_discount": "20"
        }))
        .expect("should deserialize");

        assert_eq!(product.current_discount, Some(json!("20")));
    }

    #[test]
    fn price_deserializes_from_float() {
        let product: Product = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Trail Runner",
            "price": 59.99
        }))
        .expect("should deserialize");

        assert_eq!(product.price, Decimal::new(5999, 2));
    }
}
