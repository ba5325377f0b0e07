//! Order and return records.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shipping status of an order.
///
/// The status column is an informal enumeration owned by the store; values
/// outside the known set deserialize as [`ShippingStatus::Unknown`] rather
/// than failing the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    #[serde(other)]
    Unknown,
}

impl ShippingStatus {
    /// The wire value as stored in the status column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line item inside an order.
///
/// The spreadsheet backend cannot hold nested objects, so the `items` column
/// stores a JSON-serialized `Vec<LineItem>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// A row in the `orders` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Logical order identifier (the one customers confirm digits against).
    pub id: String,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// JSON-serialized `Vec<LineItem>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub shipping_status: ShippingStatus,
    /// Set once a return has been initiated for this order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Order {
    /// Deserialize the line items column, if present.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the column holds something other than a
    /// serialized line-item list.
    pub fn line_items(&self) -> Result<Vec<LineItem>, serde_json::Error> {
        self.items
            .as_deref()
            .map_or_else(|| Ok(Vec::new()), serde_json::from_str)
    }
}

/// A row in the `returns` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReturn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub order_id: String,
    pub customer_id: String,
    pub reason: String,
    /// Always "submitted" at creation; downstream systems move it along.
    pub status: String,
    /// Defaults to the order total.
    pub refund_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
