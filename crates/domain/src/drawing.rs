//! Freehand drawings on a map.

use common::DrawingId;
use serde::{Deserialize, Serialize};

use crate::value_objects::{Point, Rgba};

/// A freehand drawing identified independently of the map that owns it.
///
/// Content is opaque to the history layer; only identity and wholesale
/// replacement matter there. A stroke in progress is repeatedly
/// re-submitted with the same identifier and growing point list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: DrawingId,
    pub points: Vec<Point>,
    pub color: Rgba,
    pub width: f32,
}

impl Drawing {
    /// Creates a drawing with the given content.
    pub fn new(id: DrawingId, points: Vec<Point>, color: Rgba, width: f32) -> Self {
        Self {
            id,
            points,
            color,
            width,
        }
    }

    /// Returns the drawing's identifier.
    pub fn id(&self) -> DrawingId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_serialization_roundtrip() {
        let drawing = Drawing::new(
            DrawingId::new(),
            vec![Point::new(0.0, 0.0), Point::new(1.0, 2.0)],
            Rgba::RED,
            2.0,
        );

        let json = serde_json::to_string(&drawing).unwrap();
        let deserialized: Drawing = serde_json::from_str(&json).unwrap();
        assert_eq!(drawing, deserialized);
    }
}
