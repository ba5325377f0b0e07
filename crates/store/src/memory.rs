//! In-memory backend for tests.
//!
//! Behaves like the production backends at the trait level: rows live in
//! named tables, inserts assign an `id` when the caller didn't, updates
//! merge fields. Update failures can be injected per table so compensation
//! paths (delete-after-failed-update) are exercisable without a network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;

use crate::{Filter, Record, RecordStore, StoreError, id_value_to_string};

/// In-memory [`RecordStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
    next_id: AtomicU64,
    failing_update_tables: RwLock<HashSet<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with rows. Rows without an `id` column get one assigned.
    pub async fn seed(&self, table: &str, rows: Vec<Value>) {
        for row in rows {
            // Seeding reuses the insert path so id assignment stays uniform.
            let _ = self.insert_row(table, row).await;
        }
    }

    /// Make every subsequent `update` on the table fail with an API error.
    pub async fn fail_updates_on(&self, table: &str) {
        self.failing_update_tables
            .write()
            .await
            .insert(table.to_owned());
    }

    /// Number of rows currently in a table.
    pub async fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, Vec::len)
    }

    /// Whether a table holds no rows.
    pub async fn is_empty(&self, table: &str) -> bool {
        self.len(table).await == 0
    }

    async fn insert_row(&self, table: &str, mut fields: Value) -> Record {
        let id = fields
            .get("id")
            .and_then(id_value_to_string)
            .unwrap_or_else(|| {
                let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                format!("mem-{n}")
            });

        // Backends with computed id columns hand the id back inside fields.
        if let Some(map) = fields.as_object_mut() {
            map.entry("id").or_insert_with(|| Value::String(id.clone()));
        }

        let record = Record { id, fields };
        self.tables
            .write()
            .await
            .entry(table.to_owned())
            .or_default()
            .push(record.clone());
        record
    }
}

fn field_matches(fields: &Value, field: &str, expected: &str) -> bool {
    fields
        .get(field)
        .and_then(id_value_to_string)
        .is_some_and(|actual| actual == expected)
}

fn matches_filter(record: &Record, filter: &Filter) -> bool {
    filter
        .conditions()
        .iter()
        .all(|(field, value)| field_matches(&record.fields, field, value))
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.get(table).map(Vec::as_slice).unwrap_or_default();
        let mut matched: Vec<Record> = rows
            .iter()
            .filter(|r| matches_filter(r, filter))
            .cloned()
            .collect();
        if let Some(max) = limit {
            matched.truncate(max);
        }
        Ok(matched)
    }

    async fn insert(&self, table: &str, fields: Value) -> Result<Record, StoreError> {
        Ok(self.insert_row(table, fields).await)
    }

    async fn update(
        &self,
        table: &str,
        record_id: &str,
        fields: Value,
    ) -> Result<Record, StoreError> {
        if self.failing_update_tables.read().await.contains(table) {
            return Err(StoreError::Api {
                status: 503,
                message: format!("injected update failure for table {table}"),
            });
        }

        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(table).ok_or_else(|| StoreError::Api {
            status: 404,
            message: format!("no such table: {table}"),
        })?;
        let record = rows
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| StoreError::Api {
                status: 404,
                message: format!("no record {record_id} in {table}"),
            })?;

        if let (Some(existing), Some(patch)) = (record.fields.as_object_mut(), fields.as_object())
        {
            for (key, value) in patch {
                existing.insert(key.clone(), value.clone());
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, table: &str, record_id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|r| r.id != record_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_id_and_select_filters() {
        let store = MemoryStore::new();
        let record = store
            .insert("customers", json!({"email": "jane@example.com"}))
            .await
            .expect("insert");
        assert!(record.id.starts_with("mem-"));
        assert_eq!(record.fields.get("id"), Some(&json!(record.id)));

        let found = store
            .select_one("customers", &Filter::new().eq("email", "jane@example.com"))
            .await
            .expect("select")
            .expect("row");
        assert_eq!(found.id, record.id);

        let missing = store
            .select_one("customers", &Filter::new().eq("email", "other@example.com"))
            .await
            .expect("select");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn insert_keeps_caller_supplied_id() {
        let store = MemoryStore::new();
        let record = store
            .insert("orders", json!({"id": "981234", "total_amount": 10.0}))
            .await
            .expect("insert");
        assert_eq!(record.id, "981234");
    }

    #[tokio::test]
    async fn numeric_columns_match_string_filters() {
        let store = MemoryStore::new();
        store.seed("customers", vec![json!({"id": 42, "email": "a@b.c"})]).await;
        let found = store
            .select_one("customers", &Filter::new().eq("id", "42"))
            .await
            .expect("select");
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryStore::new();
        let record = store
            .insert("orders", json!({"id": "981234", "shipping_status": "pending"}))
            .await
            .expect("insert");

        let updated = store
            .update("orders", &record.id, json!({"return_id": "ret-1"}))
            .await
            .expect("update");
        assert_eq!(updated.fields.get("return_id"), Some(&json!("ret-1")));
        assert_eq!(updated.fields.get("shipping_status"), Some(&json!("pending")));
    }

    #[tokio::test]
    async fn injected_update_failure_and_delete() {
        let store = MemoryStore::new();
        let record = store
            .insert("orders", json!({"id": "981234"}))
            .await
            .expect("insert");

        store.fail_updates_on("orders").await;
        let err = store
            .update("orders", &record.id, json!({"return_id": "ret-1"}))
            .await
            .expect_err("should fail");
        assert!(matches!(err, StoreError::Api { status: 503, .. }));

        store.delete("orders", &record.id).await.expect("delete");
        assert!(store.is_empty("orders").await);
    }
}
