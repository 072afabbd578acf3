//! Document layer for the map session engine.
//!
//! This crate provides the shared map document and its owned sub-entities:
//! - Map aggregate with turn tracker, drawings, and map objects
//! - DocumentStore trait for looking up maps by identifier
//! - In-memory store implementation handing out per-map lock handles
//!
//! The document carries no behavior beyond structural operations
//! (add/remove/update/find); all mutation policy lives in the history
//! layer, which resolves documents through the store at apply time.

pub mod drawing;
pub mod map;
pub mod object;
pub mod store;
pub mod turn_tracker;
pub mod value_objects;

pub use drawing::Drawing;
pub use map::Map;
pub use object::{Aura, MapObject};
pub use store::{DocumentStore, InMemoryMapStore, MapHandle};
pub use turn_tracker::{Team, TurnEntry, TurnTracker};
pub use value_objects::{Point, Rgba};
