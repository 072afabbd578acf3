//! Delta payloads broadcast to sessions viewing a map.

use chrono::{DateTime, Utc};
use common::{DrawingId, EntryId, MapId, ObjectId};
use domain::{Drawing, Rgba};
use serde::{Deserialize, Serialize};

/// A minimal message describing one map state change.
///
/// Each variant carries enough identifying information (document id,
/// object id, index, values) for a remote peer to replay the mutation
/// without the full document snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MapDelta {
    /// A turn tracker entry was inserted.
    TurnEntryAdded(TurnEntryAddedData),

    /// A turn tracker entry was removed.
    TurnEntryRemoved(TurnEntryRemovedData),

    /// An aura was appended to an object.
    AuraAdded(AuraAddedData),

    /// An aura was removed from an object.
    AuraRemoved(AuraRemovedData),

    /// An aura's range/color were overwritten.
    AuraUpdated(AuraUpdatedData),

    /// A drawing was added, or its content replaced.
    DrawingUpserted(DrawingUpsertedData),

    /// A drawing was removed.
    DrawingRemoved(DrawingRemovedData),
}

impl MapDelta {
    /// Returns the delta type name.
    pub fn delta_type(&self) -> &'static str {
        match self {
            MapDelta::TurnEntryAdded(_) => "TurnEntryAdded",
            MapDelta::TurnEntryRemoved(_) => "TurnEntryRemoved",
            MapDelta::AuraAdded(_) => "AuraAdded",
            MapDelta::AuraRemoved(_) => "AuraRemoved",
            MapDelta::AuraUpdated(_) => "AuraUpdated",
            MapDelta::DrawingUpserted(_) => "DrawingUpserted",
            MapDelta::DrawingRemoved(_) => "DrawingRemoved",
        }
    }

    /// Returns the identifier of the document this delta applies to.
    pub fn map_id(&self) -> MapId {
        match self {
            MapDelta::TurnEntryAdded(d) => d.map_id,
            MapDelta::TurnEntryRemoved(d) => d.map_id,
            MapDelta::AuraAdded(d) => d.map_id,
            MapDelta::AuraRemoved(d) => d.map_id,
            MapDelta::AuraUpdated(d) => d.map_id,
            MapDelta::DrawingUpserted(d) => d.map_id,
            MapDelta::DrawingRemoved(d) => d.map_id,
        }
    }
}

/// Data for TurnEntryAdded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEntryAddedData {
    /// The document the entry was added to.
    pub map_id: MapId,

    /// The entry's identity.
    pub entry_id: EntryId,

    /// The object the entry refers to.
    pub object_id: ObjectId,

    /// The entry's numeric value.
    pub value: i32,

    /// The owning team's name after resolution.
    pub team: String,

    /// The position the entry landed at.
    pub index: usize,

    /// When the mutation was applied.
    pub occurred_at: DateTime<Utc>,
}

/// Data for TurnEntryRemoved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEntryRemovedData {
    /// The document the entry was removed from.
    pub map_id: MapId,

    /// The removed entry's identity.
    pub entry_id: EntryId,

    /// The position the entry occupied.
    pub index: usize,

    /// When the mutation was applied.
    pub occurred_at: DateTime<Utc>,
}

/// Data for AuraAdded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraAddedData {
    /// The document the object lives on.
    pub map_id: MapId,

    /// The object the aura was appended to.
    pub object_id: ObjectId,

    /// The position the aura landed at.
    pub index: usize,

    /// The aura's range.
    pub range: f32,

    /// The aura's color.
    pub color: Rgba,

    /// When the mutation was applied.
    pub occurred_at: DateTime<Utc>,
}

/// Data for AuraRemoved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraRemovedData {
    /// The document the object lives on.
    pub map_id: MapId,

    /// The object the aura was removed from.
    pub object_id: ObjectId,

    /// The position the aura occupied.
    pub index: usize,

    /// When the mutation was applied.
    pub occurred_at: DateTime<Utc>,
}

/// Data for AuraUpdated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraUpdatedData {
    /// The document the object lives on.
    pub map_id: MapId,

    /// The object whose aura was overwritten.
    pub object_id: ObjectId,

    /// The aura's position.
    pub index: usize,

    /// The range now in effect.
    pub range: f32,

    /// The color now in effect.
    pub color: Rgba,

    /// When the mutation was applied.
    pub occurred_at: DateTime<Utc>,
}

/// Data for DrawingUpserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingUpsertedData {
    /// The document the drawing belongs to.
    pub map_id: MapId,

    /// The drawing's full content after the upsert.
    pub drawing: Drawing,

    /// When the mutation was applied.
    pub occurred_at: DateTime<Utc>,
}

/// Data for DrawingRemoved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingRemovedData {
    /// The document the drawing was removed from.
    pub map_id: MapId,

    /// The removed drawing's identifier.
    pub drawing_id: DrawingId,

    /// When the mutation was applied.
    pub occurred_at: DateTime<Utc>,
}

// Convenience constructors for deltas
impl MapDelta {
    /// Creates a TurnEntryAdded delta.
    pub fn turn_entry_added(
        map_id: MapId,
        entry_id: EntryId,
        object_id: ObjectId,
        value: i32,
        team: impl Into<String>,
        index: usize,
    ) -> Self {
        MapDelta::TurnEntryAdded(TurnEntryAddedData {
            map_id,
            entry_id,
            object_id,
            value,
            team: team.into(),
            index,
            occurred_at: Utc::now(),
        })
    }

    /// Creates a TurnEntryRemoved delta.
    pub fn turn_entry_removed(map_id: MapId, entry_id: EntryId, index: usize) -> Self {
        MapDelta::TurnEntryRemoved(TurnEntryRemovedData {
            map_id,
            entry_id,
            index,
            occurred_at: Utc::now(),
        })
    }

    /// Creates an AuraAdded delta.
    pub fn aura_added(
        map_id: MapId,
        object_id: ObjectId,
        index: usize,
        range: f32,
        color: Rgba,
    ) -> Self {
        MapDelta::AuraAdded(AuraAddedData {
            map_id,
            object_id,
            index,
            range,
            color,
            occurred_at: Utc::now(),
        })
    }

    /// Creates an AuraRemoved delta.
    pub fn aura_removed(map_id: MapId, object_id: ObjectId, index: usize) -> Self {
        MapDelta::AuraRemoved(AuraRemovedData {
            map_id,
            object_id,
            index,
            occurred_at: Utc::now(),
        })
    }

    /// Creates an AuraUpdated delta.
    pub fn aura_updated(
        map_id: MapId,
        object_id: ObjectId,
        index: usize,
        range: f32,
        color: Rgba,
    ) -> Self {
        MapDelta::AuraUpdated(AuraUpdatedData {
            map_id,
            object_id,
            index,
            range,
            color,
            occurred_at: Utc::now(),
        })
    }

    /// Creates a DrawingUpserted delta.
    pub fn drawing_upserted(map_id: MapId, drawing: Drawing) -> Self {
        MapDelta::DrawingUpserted(DrawingUpsertedData {
            map_id,
            drawing,
            occurred_at: Utc::now(),
        })
    }

    /// Creates a DrawingRemoved delta.
    pub fn drawing_removed(map_id: MapId, drawing_id: DrawingId) -> Self {
        MapDelta::DrawingRemoved(DrawingRemovedData {
            map_id,
            drawing_id,
            occurred_at: Utc::now(),
        })
    }
}
