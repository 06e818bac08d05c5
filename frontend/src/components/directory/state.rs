//! Component state for the business directory screen.
//!
//! The directory collection, the capture flow and the map adapter are owned
//! here and only mutated from `update`, one message at a time. Async work
//! (fetches, inserts) reports back through messages carrying the ticket it
//! was started with.

use std::rc::Rc;

use common::capture::AdminCaptureFlow;
use common::directory::{DirectoryState, ALL_CATEGORIES};
use common::map_view::{MapViewAdapter, ViewState};
use common::model::BusinessRecord;
use yew::prelude::*;

use crate::map::MapboxSurface;
use crate::relay::RelayStore;

use super::props::DirectoryProps;

pub struct DirectoryComponent {
    /// Transport to the relay, shared with in-flight futures.
    pub store: Rc<RelayStore>,

    pub directory: DirectoryState,

    pub capture: AdminCaptureFlow,

    /// `None` until the container node has been rendered, and again after
    /// the component is destroyed.
    pub map: Option<MapViewAdapter<MapboxSurface>>,

    /// Reference to the `<div>` the map engine draws into.
    pub map_ref: NodeRef,

    pub search: String,

    /// Selected category, or [`ALL_CATEGORIES`].
    pub category: String,

    /// Camera position shown in the overlay.
    pub view: ViewState,
}

impl DirectoryComponent {
    pub fn new(props: &DirectoryProps) -> Self {
        Self {
            store: Rc::new(RelayStore::new(&props.config.relay_url)),
            directory: DirectoryState::new(),
            capture: AdminCaptureFlow::new(props.admin),
            map: None,
            map_ref: NodeRef::default(),
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            view: props.config.map.initial_view(),
        }
    }

    /// Records matching the current search box and category selector.
    pub fn visible(&self) -> Vec<BusinessRecord> {
        self.directory.filtered(&self.search, &self.category)
    }

    /// Brings the map markers in line with `visible()`.
    pub fn sync_markers(&mut self) {
        let visible = self.visible();
        if let Some(map) = self.map.as_mut() {
            map.render_markers(&visible);
        }
    }
}
