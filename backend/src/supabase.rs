//! Record store backed by the hosted Supabase table, over its REST API.
//!
//! - Read: `GET {url}/rest/v1/{table}?select=*`
//! - Write: `POST {url}/rest/v1/{table}` with `Prefer: return=representation`,
//!   so the inserted row (and its store-assigned id) comes back in the body.
//!
//! Every request carries the service key both as `apikey` and as a bearer
//! token. One attempt per call; timeouts are whatever the transport imposes.

use common::config::StoreConfig;
use common::model::{BusinessRecord, NewBusinessRecord};
use common::store::{RecordStore, StoreError, StoreResult};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

pub struct SupabaseStore {
    client: Client,
    rows_url: String,
    service_key: String,
}

/// Error body returned by the REST layer.
#[derive(Debug, Deserialize)]
struct RestError {
    message: Option<String>,
    details: Option<String>,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: Client::new(),
            rows_url: format!("{}/rest/v1/{}", config.url, config.table),
            service_key: config.service_key.clone(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }
}

/// Decodes rows one at a time. A row another writer left malformed is
/// skipped with a warning instead of failing the whole read.
fn decode_rows(rows: Vec<Value>) -> Vec<BusinessRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value::<BusinessRecord>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("skipping unreadable row {id}: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Client errors mean the store rejected the payload; anything else means it
/// could not serve the request.
fn classify_failure(status: StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<RestError>(body)
        .ok()
        .and_then(|e| e.message.or(e.details))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            }
        });

    if status.is_client_error() {
        StoreError::ValidationError(message)
    } else {
        StoreError::StoreUnavailable(message)
    }
}

#[async_trait::async_trait(?Send)]
impl RecordStore for SupabaseStore {
    async fn fetch_all(&self) -> StoreResult<Vec<BusinessRecord>> {
        let request = self.client.get(&self.rows_url).query(&[("select", "*")]);
        let rows: Vec<Value> = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::unavailable(format!("unreadable store response: {e}")))?;
        let records = decode_rows(rows);
        debug!("store returned {} rows", records.len());
        Ok(records)
    }

    async fn insert(&self, record: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        let request = self
            .client
            .post(&self.rows_url)
            .header("Prefer", "return=representation")
            .json(&[record]);
        let rows: Vec<BusinessRecord> = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::unavailable(format!("unreadable store response: {e}")))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::unavailable("store returned no inserted row"))
    }
}
