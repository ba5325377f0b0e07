//! Customer record.

use serde::{Deserialize, Serialize};

/// A row in the `customers` table.
///
/// Uniqueness by email is enforced by lookup-before-insert in the
/// create-customer handler, not by a store constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Externally assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Customer {
    /// Display name used in greetings and order confirmations.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
