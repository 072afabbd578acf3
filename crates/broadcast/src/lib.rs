//! Broadcast layer for the map session engine.
//!
//! This crate provides the fan-out side of the system:
//! - [`MapDelta`] payloads describing one state change each, sufficient
//!   for a remote peer to replay the same mutation locally
//! - [`SessionDirectory`] of connected sessions and what they are viewing
//! - [`BroadcastSink`] seam consumed by the history layer; delivery is
//!   fire-and-forget
//!
//! Delivery order per document matches application order because the
//! history layer broadcasts as the last step of each apply while the
//! document lock is held; the sink itself never blocks on I/O.

pub mod delta;
pub mod session;
pub mod sink;

pub use delta::{
    AuraAddedData, AuraRemovedData, AuraUpdatedData, DrawingRemovedData, DrawingUpsertedData,
    MapDelta, TurnEntryAddedData, TurnEntryRemovedData,
};
pub use session::{SessionDirectory, SessionId};
pub use sink::{BroadcastSink, SessionFilter};
