//! Turn tracker entry insertion action.

use broadcast::{BroadcastSink, MapDelta, SessionFilter};
use common::MapId;
use domain::{DocumentStore, TurnEntry};

use crate::context::ActionContext;

/// Inserts a turn tracker entry; undo removes it again.
///
/// The action stores the constructed entry, so presence/absence is
/// re-validated by the entry's identity on every apply.
#[derive(Debug, Clone)]
pub struct AddTurnEntryAction {
    map_id: MapId,
    entry: TurnEntry,
    addition_index: Option<usize>,
    team: Option<String>,
}

impl AddTurnEntryAction {
    /// Creates the action.
    ///
    /// `addition_index: None` means append; the team name falls back to
    /// the tracker's first team when absent or unknown.
    pub fn new(
        map_id: MapId,
        entry: TurnEntry,
        addition_index: Option<usize>,
        team: Option<String>,
    ) -> Self {
        Self {
            map_id,
            entry,
            addition_index,
            team,
        }
    }

    /// Returns the stored entry's identity.
    pub fn entry_id(&self) -> common::EntryId {
        self.entry.id
    }

    pub(crate) async fn redo(&mut self, ctx: &ActionContext) {
        let Some(handle) = ctx.store().get(self.map_id).await else {
            return;
        };
        let mut map = handle.write().await;

        if map.turn_tracker().contains_entry(self.entry.id) {
            return;
        }
        let Some(index) = map.turn_tracker_mut().insert_entry(
            self.entry.clone(),
            self.addition_index,
            self.team.as_deref(),
        ) else {
            return;
        };
        let team = map.turn_tracker().entries()[index].team.clone();
        map.mark_dirty();

        let delta = MapDelta::turn_entry_added(
            self.map_id,
            self.entry.id,
            self.entry.object,
            self.entry.value,
            team,
            index,
        );
        ctx.sink()
            .deliver(delta, SessionFilter::ViewingMap(self.map_id))
            .await;
    }

    pub(crate) async fn undo(&mut self, ctx: &ActionContext) {
        let Some(handle) = ctx.store().get(self.map_id).await else {
            return;
        };
        let mut map = handle.write().await;

        let Some((index, entry)) = map.turn_tracker_mut().remove_entry(self.entry.id) else {
            return;
        };
        map.mark_dirty();

        let delta = MapDelta::turn_entry_removed(self.map_id, entry.id, index);
        ctx.sink()
            .deliver(delta, SessionFilter::ViewingMap(self.map_id))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use broadcast::SessionDirectory;
    use common::ObjectId;
    use domain::{DocumentStore, InMemoryMapStore, Map};

    async fn context_with_map() -> (ActionContext, MapId) {
        let store = InMemoryMapStore::new();
        let map_id = MapId::new();
        store.insert(Map::new(map_id)).await;
        let ctx = ActionContext::new(Arc::new(store), Arc::new(SessionDirectory::new()));
        (ctx, map_id)
    }

    #[tokio::test]
    async fn redo_appends_and_marks_dirty() {
        let (ctx, map_id) = context_with_map().await;
        let entry = TurnEntry::new(ObjectId::new(), 14);
        let mut action = AddTurnEntryAction::new(map_id, entry, None, None);

        action.redo(&ctx).await;

        let handle = ctx.store().get(map_id).await.unwrap();
        let map = handle.read().await;
        assert_eq!(map.turn_tracker().entry_count(), 1);
        assert_eq!(map.turn_tracker().entries()[0].team, "Default");
        assert!(map.needs_save());
    }

    #[tokio::test]
    async fn redo_is_a_no_op_when_entry_already_present() {
        let (ctx, map_id) = context_with_map().await;
        let entry = TurnEntry::new(ObjectId::new(), 14);
        let mut action = AddTurnEntryAction::new(map_id, entry, None, None);

        action.redo(&ctx).await;
        action.redo(&ctx).await;

        let handle = ctx.store().get(map_id).await.unwrap();
        assert_eq!(handle.read().await.turn_tracker().entry_count(), 1);
    }

    #[tokio::test]
    async fn undo_removes_the_entry() {
        let (ctx, map_id) = context_with_map().await;
        let entry = TurnEntry::new(ObjectId::new(), 14);
        let mut action = AddTurnEntryAction::new(map_id, entry, None, None);

        action.redo(&ctx).await;
        action.undo(&ctx).await;

        let handle = ctx.store().get(map_id).await.unwrap();
        assert!(handle.read().await.turn_tracker().is_empty());
    }

    #[tokio::test]
    async fn undo_without_prior_redo_is_a_no_op() {
        let (ctx, map_id) = context_with_map().await;
        let entry = TurnEntry::new(ObjectId::new(), 14);
        let mut action = AddTurnEntryAction::new(map_id, entry, None, None);

        action.undo(&ctx).await;

        let handle = ctx.store().get(map_id).await.unwrap();
        let map = handle.read().await;
        assert!(map.turn_tracker().is_empty());
        assert!(!map.needs_save());
    }

    #[tokio::test]
    async fn apply_against_missing_map_is_a_no_op() {
        let store = InMemoryMapStore::new();
        let ctx = ActionContext::new(Arc::new(store), Arc::new(SessionDirectory::new()));
        let entry = TurnEntry::new(ObjectId::new(), 14);
        let mut action = AddTurnEntryAction::new(MapId::new(), entry, None, None);

        action.redo(&ctx).await;
        action.undo(&ctx).await;
    }
}
