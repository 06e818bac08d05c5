//! Bodies exchanged between the browser client and the relay.
//!
//! `GET /businesses` answers with a bare JSON array of records, or `null`
//! when the relay could not read the store. `POST /businesses` answers with
//! an [`InsertResponse`] envelope carrying either the inserted rows or the
//! store's error.

use crate::model::BusinessRecord;
use crate::store::StoreError;
use serde::{Deserialize, Serialize};

pub const CODE_STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
pub const CODE_VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// A store error flattened for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFailure {
    pub message: String,
    pub code: String,
}

impl From<&StoreError> for StoreFailure {
    fn from(err: &StoreError) -> Self {
        let code = match err {
            StoreError::StoreUnavailable(_) => CODE_STORE_UNAVAILABLE,
            StoreError::ValidationError(_) => CODE_VALIDATION_ERROR,
        };
        Self {
            message: err.message().to_string(),
            code: code.to_string(),
        }
    }
}

impl From<StoreFailure> for StoreError {
    fn from(failure: StoreFailure) -> Self {
        match failure.code.as_str() {
            CODE_VALIDATION_ERROR => StoreError::ValidationError(failure.message),
            _ => StoreError::StoreUnavailable(failure.message),
        }
    }
}

/// Result of `POST /businesses`, forwarded as the store produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertResponse {
    pub data: Option<Vec<BusinessRecord>>,
    pub error: Option<StoreFailure>,
}

impl InsertResponse {
    pub fn inserted(record: BusinessRecord) -> Self {
        Self {
            data: Some(vec![record]),
            error: None,
        }
    }

    pub fn failed(err: &StoreError) -> Self {
        Self {
            data: None,
            error: Some(err.into()),
        }
    }

    /// Back into the store contract: the first inserted row, or the error.
    pub fn into_result(self) -> Result<BusinessRecord, StoreError> {
        if let Some(failure) = self.error {
            return Err(failure.into());
        }
        self.data
            .and_then(|rows| rows.into_iter().next())
            .ok_or_else(|| StoreError::unavailable("relay returned no inserted row"))
    }
}
