//! Supabase (PostgREST) backend.
//!
//! PostgREST takes equality filters natively as `field=eq.value` query
//! parameters and returns rows as flat JSON objects. The row's `id` column
//! doubles as the record handle.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;

use crate::{Filter, Record, RecordStore, StoreError, id_value_to_string};

/// Record-store backend over a Supabase project's REST surface.
pub struct SupabaseStore {
    client: reqwest::Client,
    rest_url: String,
}

impl SupabaseStore {
    /// Create a backend for one Supabase project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the service key cannot be used as
    /// an HTTP header value.
    pub fn new(project_url: &str, service_key: &SecretString) -> Result<Self, StoreError> {
        let key = service_key.expose_secret();
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| StoreError::Config(format!("invalid Supabase key: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);
        let mut auth = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| StoreError::Config(format!("invalid Supabase key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(StoreError::Http)?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    async fn handle_error(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
                .unwrap_or(body),
            Err(e) => e.to_string(),
        };
        StoreError::Api { status, message }
    }

    fn row_to_record(row: Value) -> Result<Record, StoreError> {
        let id = row
            .get("id")
            .and_then(id_value_to_string)
            .ok_or_else(|| StoreError::Decode("row is missing an id column".to_owned()))?;
        Ok(Record { id, fields: row })
    }

    async fn decode_rows(response: reqwest::Response) -> Result<Vec<Record>, StoreError> {
        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn decode_single(response: reqwest::Response) -> Result<Record, StoreError> {
        let mut records = Self::decode_rows(response).await?;
        if records.is_empty() {
            return Err(StoreError::Decode("empty representation response".to_owned()));
        }
        Ok(records.swap_remove(0))
    }
}

#[async_trait::async_trait]
impl RecordStore for SupabaseStore {
    #[instrument(skip(self, filter), fields(table = %table))]
    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, StoreError> {
        let mut query = filter.to_postgrest_params();
        query.push(("select".to_owned(), "*".to_owned()));
        if let Some(max) = limit {
            query.push(("limit".to_owned(), max.to_string()));
        }

        let response = self
            .client
            .get(self.table_url(table))
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }

        Self::decode_rows(response).await
    }

    #[instrument(skip(self, fields), fields(table = %table))]
    async fn insert(&self, table: &str, fields: Value) -> Result<Record, StoreError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&fields)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }

        Self::decode_single(response).await
    }

    #[instrument(skip(self, fields), fields(table = %table, record_id = %record_id))]
    async fn update(
        &self,
        table: &str,
        record_id: &str,
        fields: Value,
    ) -> Result<Record, StoreError> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{record_id}"))])
            .header("Prefer", "return=representation")
            .json(&fields)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }

        Self::decode_single(response).await
    }

    #[instrument(skip(self), fields(table = %table, record_id = %record_id))]
    async fn delete(&self, table: &str, record_id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{record_id}"))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }
        Ok(())
    }
}
