//! In-process record store.
//!
//! Behaves like the hosted table as far as the directory can tell: ids are
//! assigned on insert (sequential integers rendered as text), rows come back
//! in insertion order, and rows without a name or with impossible
//! coordinates are rejected the way the table's constraints would reject
//! them. A failure can be injected to exercise the degraded paths.

use super::{RecordStore, StoreError, StoreResult};
use crate::model::{BusinessRecord, NewBusinessRecord, RecordId};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    records: Vec<BusinessRecord>,
    next_id: u64,
    failure: Option<StoreError>,
    insert_calls: usize,
    fetch_calls: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `records`, ids assigned in order.
    pub fn seeded(records: impl IntoIterator<Item = NewBusinessRecord>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for record in records {
                inner.next_id += 1;
                let id = RecordId::new(inner.next_id.to_string());
                inner.records.push(record.into_record(id));
            }
        }
        store
    }

    /// Makes every following call fail with `failure` until cleared with `None`.
    pub fn fail_with(&self, failure: Option<StoreError>) {
        self.lock().failure = failure;
    }

    pub fn insert_calls(&self) -> usize {
        self.lock().insert_calls
    }

    pub fn fetch_calls(&self) -> usize {
        self.lock().fetch_calls
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait(?Send)]
impl RecordStore for MemoryStore {
    async fn fetch_all(&self) -> StoreResult<Vec<BusinessRecord>> {
        let mut inner = self.lock();
        inner.fetch_calls += 1;
        if let Some(failure) = &inner.failure {
            return Err(failure.clone());
        }
        Ok(inner.records.clone())
    }

    async fn insert(&self, record: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        let mut inner = self.lock();
        inner.insert_calls += 1;
        if let Some(failure) = &inner.failure {
            return Err(failure.clone());
        }
        record.validate().map_err(StoreError::ValidationError)?;

        inner.next_id += 1;
        let stored = record.into_record(RecordId::new(inner.next_id.to_string()));
        inner.records.push(stored.clone());
        Ok(stored)
    }
}
