//! Map document aggregate.

use std::collections::HashMap;

use common::{DrawingId, MapId, ObjectId};
use serde::{Deserialize, Serialize};

use crate::drawing::Drawing;
use crate::object::MapObject;
use crate::turn_tracker::TurnTracker;

/// The shared map document: turn tracker, drawings, and map objects.
///
/// All owned collections are mutated only while holding the map's lock
/// handle (see [`crate::store::MapHandle`]); structural membership must
/// be re-validated before every forward/reverse apply because concurrent
/// requests may have already altered a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    id: MapId,
    turn_tracker: TurnTracker,
    drawings: HashMap<DrawingId, Drawing>,
    objects: HashMap<ObjectId, MapObject>,
    needs_save: bool,
}

impl Map {
    /// Creates an empty map whose tracker has one default team.
    pub fn new(id: MapId) -> Self {
        let mut turn_tracker = TurnTracker::new();
        turn_tracker.add_team("Default");
        Self {
            id,
            turn_tracker,
            drawings: HashMap::new(),
            objects: HashMap::new(),
            needs_save: false,
        }
    }

    /// Returns the map's identifier.
    pub fn id(&self) -> MapId {
        self.id
    }

    /// Returns the turn tracker.
    pub fn turn_tracker(&self) -> &TurnTracker {
        &self.turn_tracker
    }

    /// Returns the turn tracker for mutation.
    pub fn turn_tracker_mut(&mut self) -> &mut TurnTracker {
        &mut self.turn_tracker
    }

    // Drawings

    /// Returns true if a drawing with the given identifier is present.
    pub fn contains_drawing(&self, id: DrawingId) -> bool {
        self.drawings.contains_key(&id)
    }

    /// Returns the drawing with the given identifier, if present.
    pub fn drawing(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.get(&id)
    }

    /// Inserts the drawing, or replaces the content of an existing one
    /// with the same identifier.
    ///
    /// Returns true when the drawing was newly added.
    pub fn upsert_drawing(&mut self, drawing: Drawing) -> bool {
        self.drawings.insert(drawing.id, drawing).is_none()
    }

    /// Removes the drawing with the given identifier, if present.
    pub fn remove_drawing(&mut self, id: DrawingId) -> Option<Drawing> {
        self.drawings.remove(&id)
    }

    /// Returns the number of drawings.
    pub fn drawing_count(&self) -> usize {
        self.drawings.len()
    }

    // Objects

    /// Adds an object to the map.
    pub fn insert_object(&mut self, object: MapObject) {
        self.objects.insert(object.id(), object);
    }

    /// Returns the object with the given identifier, if present.
    pub fn object(&self, id: ObjectId) -> Option<&MapObject> {
        self.objects.get(&id)
    }

    /// Returns the object with the given identifier for mutation.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut MapObject> {
        self.objects.get_mut(&id)
    }

    /// Removes the object with the given identifier, if present.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<MapObject> {
        self.objects.remove(&id)
    }

    /// Returns the number of objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // Persistence flag

    /// Returns true if the map has unsaved changes.
    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    /// Marks the map as having unsaved changes.
    ///
    /// Set by every mutating action; cleared only by the persistence
    /// collaborator.
    pub fn mark_dirty(&mut self) {
        self.needs_save = true;
    }

    /// Clears the unsaved-changes flag.
    pub fn clear_dirty(&mut self) {
        self.needs_save = false;
    }
}
