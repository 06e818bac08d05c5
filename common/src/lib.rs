//! Shared core of the business map: the record model, the store contract,
//! the in-memory directory, the map view adapter and the admin capture flow.
//!
//! Nothing in here performs I/O. The relay (`backend`) and the browser client
//! (`frontend`) plug their own transports in through [`store::RecordStore`] and
//! their own renderer through [`map_view::MapSurface`].

pub mod capture;
pub mod config;
pub mod directory;
pub mod map_view;
pub mod model;
pub mod requests;
pub mod store;
