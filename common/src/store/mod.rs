//! The record store contract.
//!
//! Two operations against the named business collection: read everything,
//! insert one. Implementations make a single attempt per call; they neither
//! cache nor retry. The relay implements this over the hosted REST API, the
//! browser client over the relay, and [`memory::MemoryStore`] in process.

use crate::model::{BusinessRecord, NewBusinessRecord};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

/// Failure kinds of a store call. The display text is what users see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or answered with a server-side failure.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    /// The store rejected the payload.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::StoreUnavailable(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::ValidationError(message.into())
    }

    /// The underlying message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            StoreError::StoreUnavailable(message) | StoreError::ValidationError(message) => message,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persists and returns business records.
///
/// Futures are not required to be `Send`: the browser transport runs on a
/// single-threaded executor.
#[async_trait(?Send)]
pub trait RecordStore {
    /// Every record currently in the store, in store order.
    async fn fetch_all(&self) -> StoreResult<Vec<BusinessRecord>>;

    /// Inserts one record and returns it with the id the store assigned.
    async fn insert(&self, record: NewBusinessRecord) -> StoreResult<BusinessRecord>;
}

#[async_trait(?Send)]
impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    async fn fetch_all(&self) -> StoreResult<Vec<BusinessRecord>> {
        (**self).fetch_all().await
    }

    async fn insert(&self, record: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        (**self).insert(record).await
    }
}

#[async_trait(?Send)]
impl<S: RecordStore + ?Sized> RecordStore for std::rc::Rc<S> {
    async fn fetch_all(&self) -> StoreResult<Vec<BusinessRecord>> {
        (**self).fetch_all().await
    }

    async fn insert(&self, record: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        (**self).insert(record).await
    }
}
