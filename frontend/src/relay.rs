//! Record store reached through the relay's `/businesses` endpoints, so the
//! browser never holds datastore credentials.

use async_trait::async_trait;
use common::model::{BusinessRecord, NewBusinessRecord};
use common::requests::InsertResponse;
use common::store::{RecordStore, StoreError, StoreResult};
use gloo_net::http::Request;

pub struct RelayStore {
    url: String,
}

impl RelayStore {
    /// `base_url` may be empty, meaning the page's own origin.
    pub fn new(base_url: &str) -> Self {
        Self {
            url: format!("{}/businesses", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait(?Send)]
impl RecordStore for RelayStore {
    async fn fetch_all(&self) -> StoreResult<Vec<BusinessRecord>> {
        let response = Request::get(&self.url)
            .send()
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        if !response.ok() {
            return Err(StoreError::unavailable(format!(
                "relay answered {}",
                response.status()
            )));
        }

        // The relay answers `null` when it could not read the store.
        let rows: Option<Vec<BusinessRecord>> = response
            .json()
            .await
            .map_err(|e| StoreError::unavailable(format!("unreadable relay response: {e}")))?;
        rows.ok_or_else(|| StoreError::unavailable("the relay could not read the store"))
    }

    async fn insert(&self, record: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        let response = Request::post(&self.url)
            .json(&record)
            .map_err(|e| StoreError::validation(e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        if !response.ok() {
            return Err(StoreError::unavailable(format!(
                "relay answered {}",
                response.status()
            )));
        }

        let envelope: InsertResponse = response
            .json()
            .await
            .map_err(|e| StoreError::unavailable(format!("unreadable relay response: {e}")))?;
        envelope.into_result()
    }
}
