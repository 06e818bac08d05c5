//! Directory state: the authoritative in-memory list of business records and
//! the read-only views derived from it.
//!
//! A refresh is a full re-fetch that replaces the collection wholesale. Since
//! fetches complete asynchronously and may overlap, a refresh is split into
//! [`DirectoryState::begin_refresh`], which hands out a ticket, and
//! [`DirectoryState::apply_refresh`], which installs the fetched rows only if
//! that ticket is still the newest one issued. An older fetch finishing late
//! can therefore never overwrite newer data.

use crate::model::{BusinessRecord, RecordId};
use crate::store::{RecordStore, StoreResult};
use log::{debug, warn};

/// Category filter value that lets every record through.
pub const ALL_CATEGORIES: &str = "all";

/// Identifies one in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Default)]
pub struct DirectoryState {
    records: Vec<BusinessRecord>,
    issued: u64,
    applied: u64,
}

impl DirectoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh; any refresh started earlier becomes superseded.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Installs the outcome of the fetch started with `ticket`.
    ///
    /// A failed read degrades to an empty directory. Returns `false` when the
    /// ticket was superseded and the result discarded.
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: StoreResult<Vec<BusinessRecord>>,
    ) -> bool {
        if ticket.0 != self.issued || ticket.0 <= self.applied {
            debug!(
                "discarding superseded refresh #{} (latest #{})",
                ticket.0, self.issued
            );
            return false;
        }

        self.records = match result {
            Ok(records) => {
                debug!("directory refreshed with {} records", records.len());
                records
            }
            Err(err) => {
                warn!("directory refresh failed, showing no businesses: {err}");
                Vec::new()
            }
        };
        self.applied = ticket.0;
        true
    }

    /// Whether a refresh has been started and not yet applied.
    pub fn is_refreshing(&self) -> bool {
        self.issued > self.applied
    }

    /// Fetches everything from `store` and replaces the collection.
    pub async fn refresh<S: RecordStore + ?Sized>(&mut self, store: &S) -> bool {
        let ticket = self.begin_refresh();
        let result = store.fetch_all().await;
        self.apply_refresh(ticket, result)
    }

    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&BusinessRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Records whose name or category contains `search` (case-insensitive)
    /// and whose category equals `category`, unless it is [`ALL_CATEGORIES`].
    /// `search` is matched verbatim; surrounding whitespace is significant.
    pub fn filtered(&self, search: &str, category: &str) -> Vec<BusinessRecord> {
        let needle = search.to_lowercase();
        self.records
            .iter()
            .filter(|r| category == ALL_CATEGORIES || r.category == category)
            .filter(|r| {
                needle.is_empty()
                    || r.name.to_lowercase().contains(&needle)
                    || r.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// [`ALL_CATEGORIES`] followed by every distinct non-empty category, in
    /// order of first appearance.
    pub fn distinct_categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for record in &self.records {
            let category = record.category.as_str();
            if !category.is_empty() && !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }
        categories
    }
}
