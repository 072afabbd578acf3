//! Drawing upsert action.

use broadcast::{BroadcastSink, MapDelta, SessionFilter};
use common::MapId;
use domain::{DocumentStore, Drawing};

use crate::context::ActionContext;

/// Adds a drawing to the document; undo removes it.
///
/// This is a small-change action keyed on the drawing's identifier:
/// continuous stroke updates re-submit the same drawing with grown
/// content, and each update replaces the pending entry's stored
/// drawing in place, so the whole stroke collapses into one undoable
/// step. The forward effect is an upsert for the same reason: a
/// stroke continuation finds its drawing already present and replaces
/// the content.
#[derive(Debug, Clone)]
pub struct DrawingAction {
    map_id: MapId,
    drawing: Drawing,
}

impl DrawingAction {
    /// Creates the action for the given drawing content.
    pub fn new(map_id: MapId, drawing: Drawing) -> Self {
        Self { map_id, drawing }
    }

    /// Returns the drawing's identifier.
    pub fn drawing_id(&self) -> common::DrawingId {
        self.drawing.id
    }

    /// Replaces the stored drawing content when the incoming action
    /// targets the same drawing.
    pub(crate) fn absorb(&mut self, incoming: &DrawingAction) -> bool {
        if self.map_id != incoming.map_id || self.drawing.id != incoming.drawing.id {
            return false;
        }
        self.drawing = incoming.drawing.clone();
        true
    }

    pub(crate) async fn redo(&mut self, ctx: &ActionContext) {
        let Some(handle) = ctx.store().get(self.map_id).await else {
            return;
        };
        let mut map = handle.write().await;

        map.upsert_drawing(self.drawing.clone());
        map.mark_dirty();

        let delta = MapDelta::drawing_upserted(self.map_id, self.drawing.clone());
        ctx.sink()
            .deliver(delta, SessionFilter::ViewingMap(self.map_id))
            .await;
    }

    pub(crate) async fn undo(&mut self, ctx: &ActionContext) {
        let Some(handle) = ctx.store().get(self.map_id).await else {
            return;
        };
        let mut map = handle.write().await;

        if map.remove_drawing(self.drawing.id).is_none() {
            return;
        }
        map.mark_dirty();

        let delta = MapDelta::drawing_removed(self.map_id, self.drawing.id);
        ctx.sink()
            .deliver(delta, SessionFilter::ViewingMap(self.map_id))
            .await;
    }
}
