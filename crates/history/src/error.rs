//! History layer error types.

use common::MapId;
use thiserror::Error;

/// Errors surfaced when translating a client intent into an action.
///
/// Expected races are never errors: a precondition that fails between
/// decision time and apply time is a silent no-op, and an undo/redo
/// with nothing to do is a boolean no-op. Only addressing a document
/// that is not in the store at decision time is rejected here, at
/// action construction.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The addressed map is not in the document store.
    #[error("Map not found: {map_id}")]
    MapNotFound { map_id: MapId },
}

/// Result type for intent-translation operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
