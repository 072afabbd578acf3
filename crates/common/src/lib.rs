//! Shared identifier types for the map session engine.

pub mod types;

pub use types::{ClientId, DrawingId, EntryId, MapId, ObjectId};
