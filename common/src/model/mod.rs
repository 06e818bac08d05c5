pub mod business;

pub use business::{BusinessRecord, Coordinates, DEFAULT_CATEGORY, NewBusinessRecord, PowerType, RecordId};
