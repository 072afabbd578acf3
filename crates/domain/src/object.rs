//! Map objects and their status-effect aura lists.

use common::{MapId, ObjectId};
use serde::{Deserialize, Serialize};

use crate::value_objects::Rgba;

/// A status-effect aura attached to a map object.
///
/// The aura's index is implicit: its position in the owning object's
/// sequence. Index arguments carried by actions are positions at
/// decision time and must be re-checked against the live sequence
/// before mutating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aura {
    pub range: f32,
    pub color: Rgba,
}

impl Aura {
    /// Creates an aura with the given range and color.
    pub fn new(range: f32, color: Rgba) -> Self {
        Self { range, color }
    }
}

/// An object placed on a map, owning an ordered aura list.
///
/// The `map_id` back-reference is a plain identifier, not ownership:
/// the owning map is looked up through the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapObject {
    id: ObjectId,
    map_id: MapId,
    auras: Vec<Aura>,
}

impl MapObject {
    /// Creates an object on the given map with no auras.
    pub fn new(id: ObjectId, map_id: MapId) -> Self {
        Self {
            id,
            map_id,
            auras: Vec::new(),
        }
    }

    /// Returns the object's identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the identifier of the owning map.
    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    /// Returns the auras in order.
    pub fn auras(&self) -> &[Aura] {
        &self.auras
    }

    /// Returns the aura at the given position, if in range.
    pub fn aura(&self, index: usize) -> Option<&Aura> {
        self.auras.get(index)
    }

    /// Returns the number of auras.
    pub fn aura_count(&self) -> usize {
        self.auras.len()
    }

    /// Appends an aura, returning the position it landed at.
    pub fn push_aura(&mut self, aura: Aura) -> usize {
        self.auras.push(aura);
        self.auras.len() - 1
    }

    /// Inserts an aura at the given position, clamping past-end to
    /// append. Returns the position it landed at.
    pub fn insert_aura(&mut self, index: usize, aura: Aura) -> usize {
        let at = index.min(self.auras.len());
        self.auras.insert(at, aura);
        at
    }

    /// Removes the aura at the given position, if in range.
    pub fn remove_aura(&mut self, index: usize) -> Option<Aura> {
        if index < self.auras.len() {
            Some(self.auras.remove(index))
        } else {
            None
        }
    }

    /// Overwrites the aura at the given position.
    ///
    /// Returns false without mutating when the index is out of range.
    pub fn set_aura(&mut self, index: usize, range: f32, color: Rgba) -> bool {
        if let Some(aura) = self.auras.get_mut(index) {
            aura.range = range;
            aura.color = color;
            true
        } else {
            false
        }
    }
}
