//! Airtable records API backend.
//!
//! Airtable addresses rows by an opaque `rec…` id and keeps column values in
//! a nested `fields` object. Equality filters are rendered into a
//! `filterByFormula` expression with escaped values (see [`Filter`]).

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::{Filter, Record, RecordStore, StoreError};

const AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";

/// Record-store backend over the Airtable REST API.
pub struct AirtableStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    id: String,
    fields: Value,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    records: Vec<AirtableRecord>,
}

#[derive(Debug, Serialize)]
struct CreatePayload {
    records: Vec<FieldsPayload>,
    /// Let Airtable coerce numeric strings into number columns, matching
    /// what the sheet does for manual entry.
    typecast: bool,
}

#[derive(Debug, Serialize)]
struct FieldsPayload {
    fields: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Airtable error payloads are either a bare string code or an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Code(String),
    Object { message: String },
}

impl From<AirtableRecord> for Record {
    fn from(record: AirtableRecord) -> Self {
        Self {
            id: record.id,
            fields: record.fields,
        }
    }
}

impl AirtableStore {
    /// Create a backend for one Airtable base.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the API key cannot be used as an
    /// HTTP header value.
    pub fn new(api_key: &SecretString, base_id: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| StoreError::Config(format!("invalid Airtable API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(StoreError::Http)?;

        Ok(Self {
            client,
            base_url: format!("{AIRTABLE_API_URL}/{base_id}"),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.base_url)
    }

    async fn handle_error(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => match serde_json::from_str::<ErrorBody>(&body) {
                Ok(ErrorBody {
                    error: ErrorDetail::Object { message },
                }) => message,
                Ok(ErrorBody {
                    error: ErrorDetail::Code(code),
                }) => code,
                Err(_) => body,
            },
            Err(e) => e.to_string(),
        };
        StoreError::Api { status, message }
    }

    async fn decode_single(response: reqwest::Response) -> Result<Record, StoreError> {
        let record: AirtableRecord = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(record.into())
    }
}

#[async_trait::async_trait]
impl RecordStore for AirtableStore {
    #[instrument(skip(self, filter), fields(table = %table))]
    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Record>, StoreError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(formula) = filter.to_airtable_formula() {
            query.push(("filterByFormula", formula));
        }
        if let Some(max) = limit {
            query.push(("maxRecords", max.to_string()));
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

        let list: ListResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(list.records.into_iter().map(Record::from).collect())
    }

    #[instrument(skip(self, fields), fields(table = %table))]
    async fn insert(&self, table: &str, fields: Value) -> Result<Record, StoreError> {
        let payload = CreatePayload {
            records: vec![FieldsPayload { fields }],
            typecast: true,
        };

        let response = self
            .client
            .post(self.table_url(table))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }

        let mut list: ListResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        if list.records.is_empty() {
            return Err(StoreError::Decode("empty create response".to_owned()));
        }
        Ok(list.records.swap_remove(0).into())
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
            .patch(format!("{}/{record_id}", self.table_url(table)))
            .json(&FieldsPayload { fields })
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
            .delete(format!("{}/{record_id}", self.table_url(table)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }
        Ok(())
    }
}
