//! Owl Shoes Store - Record-store adapter.
//!
//! Every handler performs the same small set of operations against a named
//! logical table: select-by-equality (optionally capped), insert-one, and
//! update-by-identifier. Two interchangeable production backends exist - the
//! Airtable records API and Supabase's PostgREST surface - plus an in-memory
//! backend for tests. The [`RecordStore`] trait hides the asymmetry between
//! them so handler logic is written exactly once.
//!
//! # Record identity
//!
//! [`Record::id`] is the backend's own record handle: Airtable's `rec…` id,
//! or the row's `id` column under PostgREST. Ids are only meaningful to the
//! store that produced them; callers must never mix handles across backends.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod airtable;
mod error;
mod filter;
mod memory;
mod supabase;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use airtable::AirtableStore;
pub use error::StoreError;
pub use filter::Filter;
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

/// A single row from a logical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Backend-specific record handle (see module docs).
    pub id: String,
    /// The row's column values as a JSON object.
    pub fields: Value,
}

impl Record {
    /// Deserialize the record fields into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if the fields do not match the target
    /// shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.fields.clone()).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Uniform interface over the configured record backend.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Select rows matching the filter, optionally capped.
    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, StoreError>;

    /// Insert one row; returns the stored record including backend-assigned
    /// fields.
    async fn insert(&self, table: &str, fields: Value) -> Result<Record, StoreError>;

    /// Patch the identified row with the given fields.
    async fn update(&self, table: &str, record_id: &str, fields: Value)
    -> Result<Record, StoreError>;

    /// Delete the identified row. Used only for compensation after a failed
    /// follow-up write.
    async fn delete(&self, table: &str, record_id: &str) -> Result<(), StoreError>;

    /// Select at most one row matching the filter.
    async fn select_one(
        &self,
        table: &str,
        filter: &Filter,
    ) -> Result<Option<Record>, StoreError> {
        let mut records = self.select(table, filter, Some(1)).await?;
        Ok(if records.is_empty() {
            None
        } else {
            Some(records.swap_remove(0))
        })
    }
}

/// Render a JSON id value (string or number column) as a string handle.
#[must_use]
pub fn id_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_decode_reports_shape_mismatch() {
        let record = Record {
            id: "rec1".to_owned(),
            fields: json!({"rating": "not-a-number"}),
        };

        #[derive(Debug, serde::Deserialize)]
        struct Typed {
            #[allow(dead_code)]
            rating: u8,
        }

        let err = record.decode::<Typed>().expect_err("should fail");
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn id_values_stringify() {
        assert_eq!(id_value_to_string(&json!("42")), Some("42".to_owned()));
        assert_eq!(id_value_to_string(&json!(42)), Some("42".to_owned()));
        assert_eq!(id_value_to_string(&json!(null)), None);
    }
}
