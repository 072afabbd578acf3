//! Aura list actions: add/remove and range/color change.

use std::time::Instant;

use broadcast::{BroadcastSink, MapDelta, SessionFilter};
use common::{MapId, ObjectId};
use domain::{Aura, DocumentStore, Rgba};

use crate::context::ActionContext;

use super::SMALL_CHANGE_WINDOW;

/// Appends an aura to an object, or removes one at a stored index;
/// undo is the inverse in either case.
///
/// For the addition case, the appended index is recorded at apply time
/// so undo can remove at the now-known position. For the removal case,
/// the forward apply captures the actually-removed aura's values, so
/// undo re-inserts exactly what was removed even if a concurrent edit
/// changed the aura between decision time and apply.
#[derive(Debug, Clone)]
pub struct AuraAddOrRemoveAction {
    map_id: MapId,
    object_id: ObjectId,
    is_addition: bool,
    index: Option<usize>,
    range: f32,
    color: Rgba,
}

impl AuraAddOrRemoveAction {
    /// Creates an addition action for the given aura values.
    pub fn addition(map_id: MapId, object_id: ObjectId, range: f32, color: Rgba) -> Self {
        Self {
            map_id,
            object_id,
            is_addition: true,
            index: None,
            range,
            color,
        }
    }

    /// Creates a removal action for the aura at the given position,
    /// with the values it held at decision time.
    pub fn removal(
        map_id: MapId,
        object_id: ObjectId,
        index: usize,
        range: f32,
        color: Rgba,
    ) -> Self {
        Self {
            map_id,
            object_id,
            is_addition: false,
            index: Some(index),
            range,
            color,
        }
    }

    /// Returns true if this action adds an aura on redo.
    pub fn is_addition(&self) -> bool {
        self.is_addition
    }

    pub(crate) async fn redo(&mut self, ctx: &ActionContext) {
        let Some(handle) = ctx.store().get(self.map_id).await else {
            return;
        };
        let mut map = handle.write().await;

        if self.is_addition {
            let Some(object) = map.object_mut(self.object_id) else {
                return;
            };
            let index = object.push_aura(Aura::new(self.range, self.color));
            self.index = Some(index);
            map.mark_dirty();

            let delta =
                MapDelta::aura_added(self.map_id, self.object_id, index, self.range, self.color);
            ctx.sink()
                .deliver(delta, SessionFilter::ViewingMap(self.map_id))
                .await;
        } else {
            let Some(index) = self.index else {
                return;
            };
            let Some(object) = map.object_mut(self.object_id) else {
                return;
            };
            let Some(removed) = object.remove_aura(index) else {
                return;
            };
            self.range = removed.range;
            self.color = removed.color;
            map.mark_dirty();

            let delta = MapDelta::aura_removed(self.map_id, self.object_id, index);
            ctx.sink()
                .deliver(delta, SessionFilter::ViewingMap(self.map_id))
                .await;
        }
    }

    pub(crate) async fn undo(&mut self, ctx: &ActionContext) {
        let Some(handle) = ctx.store().get(self.map_id).await else {
            return;
        };
        let mut map = handle.write().await;

        if self.is_addition {
            // remove at the index recorded by the forward apply, if the
            // aura list still reaches that far
            let Some(index) = self.index else {
                return;
            };
            let Some(object) = map.object_mut(self.object_id) else {
                return;
            };
            if object.remove_aura(index).is_none() {
                return;
            }
            map.mark_dirty();

            let delta = MapDelta::aura_removed(self.map_id, self.object_id, index);
            ctx.sink()
                .deliver(delta, SessionFilter::ViewingMap(self.map_id))
                .await;
        } else {
            let Some(index) = self.index else {
                return;
            };
            let Some(object) = map.object_mut(self.object_id) else {
                return;
            };
            let at = object.insert_aura(index, Aura::new(self.range, self.color));
            map.mark_dirty();

            let delta = MapDelta::aura_added(self.map_id, self.object_id, at, self.range, self.color);
            ctx.sink()
                .deliver(delta, SessionFilter::ViewingMap(self.map_id))
                .await;
        }
    }
}

/// Overwrites an aura's range and color; undo restores the values the
/// aura had when the gesture began.
///
/// This is a small-change action: consecutive changes to the same
/// container index within [`SMALL_CHANGE_WINDOW`] merge into one
/// undoable step, so dragging a slider produces a single history entry
/// whose undo restores the pre-drag values.
#[derive(Debug, Clone)]
pub struct AuraChangeAction {
    map_id: MapId,
    object_id: ObjectId,
    index: usize,
    initial: Aura,
    new: Aura,
    modified_at: Instant,
}

impl AuraChangeAction {
    /// Creates the action, stamping the submission time now.
    pub fn new(map_id: MapId, object_id: ObjectId, index: usize, initial: Aura, new: Aura) -> Self {
        Self::new_at(map_id, object_id, index, initial, new, Instant::now())
    }

    /// Creates the action with an explicit submission time.
    pub fn new_at(
        map_id: MapId,
        object_id: ObjectId,
        index: usize,
        initial: Aura,
        new: Aura,
        at: Instant,
    ) -> Self {
        Self {
            map_id,
            object_id,
            index,
            initial,
            new,
            modified_at: at,
        }
    }

    /// Returns the values the aura held when the gesture began.
    pub fn initial(&self) -> Aura {
        self.initial
    }

    /// Returns the values the action applies on redo.
    pub fn new_values(&self) -> Aura {
        self.new
    }

    /// Returns the last-modify time of this action.
    pub fn modified_at(&self) -> Instant {
        self.modified_at
    }

    /// Merges an incoming change into this one if it targets the same
    /// container index and falls inside the coalescing window.
    ///
    /// On a merge the pending entry takes the incoming new values and
    /// timestamp; its initial values stay those of the first change, so
    /// one undo restores the true pre-gesture state.
    pub(crate) fn absorb(&mut self, incoming: &AuraChangeAction) -> bool {
        if self.map_id != incoming.map_id
            || self.object_id != incoming.object_id
            || self.index != incoming.index
        {
            return false;
        }
        if incoming
            .modified_at
            .saturating_duration_since(self.modified_at)
            >= SMALL_CHANGE_WINDOW
        {
            return false;
        }

        self.new = incoming.new;
        self.modified_at = incoming.modified_at;
        true
    }

    pub(crate) async fn redo(&mut self, ctx: &ActionContext) {
        self.apply(ctx, self.new).await;
    }

    pub(crate) async fn undo(&mut self, ctx: &ActionContext) {
        self.apply(ctx, self.initial).await;
    }

    async fn apply(&self, ctx: &ActionContext, values: Aura) {
        let Some(handle) = ctx.store().get(self.map_id).await else {
            return;
        };
        let mut map = handle.write().await;

        let Some(object) = map.object_mut(self.object_id) else {
            return;
        };
        if !object.set_aura(self.index, values.range, values.color) {
            return;
        }
        map.mark_dirty();

        let delta = MapDelta::aura_updated(
            self.map_id,
            self.object_id,
            self.index,
            values.range,
            values.color,
        );
        ctx.sink()
            .deliver(delta, SessionFilter::ViewingMap(self.map_id))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use broadcast::SessionDirectory;
    use domain::{DocumentStore, InMemoryMapStore, Map, MapObject};

    async fn context_with_object() -> (ActionContext, MapId, ObjectId) {
        let store = InMemoryMapStore::new();
        let map_id = MapId::new();
        let object_id = ObjectId::new();
        let mut map = Map::new(map_id);
        map.insert_object(MapObject::new(object_id, map_id));
        store.insert(map).await;
        let ctx = ActionContext::new(Arc::new(store), Arc::new(SessionDirectory::new()));
        (ctx, map_id, object_id)
    }

    async fn aura_at(ctx: &ActionContext, map_id: MapId, object_id: ObjectId, index: usize) -> Option<Aura> {
        let handle = ctx.store().get(map_id).await.unwrap();
        let map = handle.read().await;
        map.object(object_id).and_then(|o| o.aura(index).copied())
    }

    #[tokio::test]
    async fn addition_records_appended_index() {
        let (ctx, map_id, object_id) = context_with_object().await;
        let mut action = AuraAddOrRemoveAction::addition(map_id, object_id, 5.0, Rgba::RED);

        action.redo(&ctx).await;

        assert_eq!(action.index, Some(0));
        assert_eq!(
            aura_at(&ctx, map_id, object_id, 0).await,
            Some(Aura::new(5.0, Rgba::RED))
        );
    }

    #[tokio::test]
    async fn addition_undo_twice_does_not_remove_an_unrelated_aura() {
        let (ctx, map_id, object_id) = context_with_object().await;
        let mut action = AuraAddOrRemoveAction::addition(map_id, object_id, 5.0, Rgba::RED);

        action.redo(&ctx).await;
        action.undo(&ctx).await;
        // second undo simulates a race; the recorded index is now out of
        // range, so nothing else may be removed
        action.undo(&ctx).await;

        let handle = ctx.store().get(map_id).await.unwrap();
        assert_eq!(
            handle.read().await.object(object_id).unwrap().aura_count(),
            0
        );
    }

    #[tokio::test]
    async fn removal_captures_removed_values_for_undo() {
        let (ctx, map_id, object_id) = context_with_object().await;
        {
            let handle = ctx.store().get(map_id).await.unwrap();
            let mut map = handle.write().await;
            map.object_mut(object_id)
                .unwrap()
                .push_aura(Aura::new(9.0, Rgba::BLUE));
        }

        // decision-time values are stale on purpose
        let mut action = AuraAddOrRemoveAction::removal(map_id, object_id, 0, 1.0, Rgba::WHITE);
        action.redo(&ctx).await;
        action.undo(&ctx).await;

        assert_eq!(
            aura_at(&ctx, map_id, object_id, 0).await,
            Some(Aura::new(9.0, Rgba::BLUE))
        );
    }

    #[tokio::test]
    async fn removal_redo_out_of_range_is_a_no_op() {
        let (ctx, map_id, object_id) = context_with_object().await;
        let mut action = AuraAddOrRemoveAction::removal(map_id, object_id, 3, 1.0, Rgba::WHITE);

        action.redo(&ctx).await;

        let handle = ctx.store().get(map_id).await.unwrap();
        assert!(!handle.read().await.needs_save());
    }

    #[tokio::test]
    async fn change_overwrites_and_restores() {
        let (ctx, map_id, object_id) = context_with_object().await;
        {
            let handle = ctx.store().get(map_id).await.unwrap();
            let mut map = handle.write().await;
            map.object_mut(object_id)
                .unwrap()
                .push_aura(Aura::new(5.0, Rgba::RED));
        }

        let mut action = AuraChangeAction::new(
            map_id,
            object_id,
            0,
            Aura::new(5.0, Rgba::RED),
            Aura::new(7.0, Rgba::BLUE),
        );

        action.redo(&ctx).await;
        assert_eq!(
            aura_at(&ctx, map_id, object_id, 0).await,
            Some(Aura::new(7.0, Rgba::BLUE))
        );

        action.undo(&ctx).await;
        assert_eq!(
            aura_at(&ctx, map_id, object_id, 0).await,
            Some(Aura::new(5.0, Rgba::RED))
        );
    }

    #[tokio::test]
    async fn change_out_of_range_is_a_no_op() {
        let (ctx, map_id, object_id) = context_with_object().await;
        let mut action = AuraChangeAction::new(
            map_id,
            object_id,
            2,
            Aura::new(5.0, Rgba::RED),
            Aura::new(7.0, Rgba::BLUE),
        );

        action.redo(&ctx).await;

        let handle = ctx.store().get(map_id).await.unwrap();
        assert!(!handle.read().await.needs_save());
    }

    #[test]
    fn absorb_within_window_takes_new_values_and_timestamp() {
        let map_id = MapId::new();
        let object_id = ObjectId::new();
        let start = Instant::now();
        let mut pending = AuraChangeAction::new_at(
            map_id,
            object_id,
            0,
            Aura::new(5.0, Rgba::RED),
            Aura::new(6.0, Rgba::RED),
            start,
        );
        let incoming = AuraChangeAction::new_at(
            map_id,
            object_id,
            0,
            Aura::new(6.0, Rgba::RED),
            Aura::new(7.0, Rgba::BLUE),
            start + Duration::from_millis(1000),
        );

        assert!(pending.absorb(&incoming));
        assert_eq!(pending.new_values(), Aura::new(7.0, Rgba::BLUE));
        assert_eq!(pending.initial(), Aura::new(5.0, Rgba::RED));
        assert_eq!(pending.modified_at(), incoming.modified_at());
    }

    #[test]
    fn absorb_outside_window_is_rejected() {
        let map_id = MapId::new();
        let object_id = ObjectId::new();
        let start = Instant::now();
        let mut pending = AuraChangeAction::new_at(
            map_id,
            object_id,
            0,
            Aura::new(5.0, Rgba::RED),
            Aura::new(6.0, Rgba::RED),
            start,
        );
        let incoming = AuraChangeAction::new_at(
            map_id,
            object_id,
            0,
            Aura::new(6.0, Rgba::RED),
            Aura::new(7.0, Rgba::BLUE),
            start + SMALL_CHANGE_WINDOW,
        );

        assert!(!pending.absorb(&incoming));
        assert_eq!(pending.new_values(), Aura::new(6.0, Rgba::RED));
    }

    #[test]
    fn absorb_different_index_is_rejected() {
        let map_id = MapId::new();
        let object_id = ObjectId::new();
        let mut pending = AuraChangeAction::new(
            map_id,
            object_id,
            0,
            Aura::new(5.0, Rgba::RED),
            Aura::new(6.0, Rgba::RED),
        );
        let incoming = AuraChangeAction::new(
            map_id,
            object_id,
            1,
            Aura::new(5.0, Rgba::RED),
            Aura::new(7.0, Rgba::BLUE),
        );

        assert!(!pending.absorb(&incoming));
    }
}
