//! Shared state injected into every relay handler.

use common::store::RecordStore;
use std::sync::Arc;

/// The store the relay forwards to, shared by all workers.
pub type SharedStore = Arc<dyn RecordStore + Send + Sync>;

/// Cloned into each Actix worker as `web::Data`. Holds no per-request data:
/// the relay is stateless apart from the store handle.
#[derive(Clone)]
pub struct RelayState {
    pub store: SharedStore,
}

impl RelayState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}
