//! Intent service translating client requests into recorded actions.

use std::collections::HashMap;
use std::sync::Arc;

use broadcast::BroadcastSink;
use common::{ClientId, MapId, ObjectId};
use domain::{DocumentStore, Drawing, MapHandle, Rgba, TurnEntry};
use tokio::sync::RwLock;

use crate::action::{
    Action, AddTurnEntryAction, AuraAddOrRemoveAction, AuraChangeAction, DrawingAction,
};
use crate::config::HistoryConfig;
use crate::context::ActionContext;
use crate::error::{HistoryError, Result};
use crate::history::ActionHistory;

/// Service for mutating map documents through per-client histories.
///
/// Each accepted intent becomes a concrete action: the service applies
/// the action's forward effect (which broadcasts the delta), then hands
/// it to the originating client's history, where coalescing and
/// truncation rules decide whether it becomes a new undoable entry.
///
/// A document lock is never held across the call into a history; the
/// forward apply completes and releases the document before the history
/// lock is taken.
pub struct MapSessionService {
    context: ActionContext,
    config: HistoryConfig,
    histories: RwLock<HashMap<ClientId, Arc<ActionHistory>>>,
}

impl MapSessionService {
    /// Creates a service over a document store and a broadcast sink
    /// with default configuration.
    pub fn new(store: Arc<dyn DocumentStore>, sink: Arc<dyn BroadcastSink>) -> Self {
        Self::with_config(store, sink, HistoryConfig::default())
    }

    /// Creates a service with the given configuration.
    pub fn with_config(
        store: Arc<dyn DocumentStore>,
        sink: Arc<dyn BroadcastSink>,
        config: HistoryConfig,
    ) -> Self {
        Self {
            context: ActionContext::new(store, sink),
            config,
            histories: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the apply context.
    pub fn context(&self) -> &ActionContext {
        &self.context
    }

    /// Returns the history for a client, creating it on first use.
    pub async fn history_for(&self, client: ClientId) -> Arc<ActionHistory> {
        if let Some(history) = self.histories.read().await.get(&client) {
            return Arc::clone(history);
        }

        let mut histories = self.histories.write().await;
        let history = histories.entry(client).or_insert_with(|| {
            Arc::new(ActionHistory::with_buffer_size(
                client,
                self.context.clone(),
                self.config.action_buffer_size,
            ))
        });
        Arc::clone(history)
    }

    /// Adds a turn tracker entry for an object.
    ///
    /// `index: None` appends; the team name falls back to the first
    /// team when absent or unknown.
    #[tracing::instrument(skip(self))]
    pub async fn add_turn_entry(
        &self,
        client: ClientId,
        map_id: MapId,
        object_id: ObjectId,
        value: i32,
        team: Option<String>,
        index: Option<usize>,
    ) -> Result<()> {
        self.require_map(map_id).await?;

        let entry = TurnEntry::new(object_id, value);
        let action = Action::AddTurnEntry(AddTurnEntryAction::new(map_id, entry, index, team));
        self.submit(client, action).await;
        Ok(())
    }

    /// Appends an aura to an object.
    #[tracing::instrument(skip(self))]
    pub async fn add_aura(
        &self,
        client: ClientId,
        map_id: MapId,
        object_id: ObjectId,
        range: f32,
        color: Rgba,
    ) -> Result<()> {
        self.require_map(map_id).await?;

        let action =
            Action::AuraAddOrRemove(AuraAddOrRemoveAction::addition(map_id, object_id, range, color));
        self.submit(client, action).await;
        Ok(())
    }

    /// Removes the aura at the given position.
    ///
    /// A missing object or out-of-range index at decision time is a
    /// silent no-op: the state the client acted on is already gone.
    #[tracing::instrument(skip(self))]
    pub async fn remove_aura(
        &self,
        client: ClientId,
        map_id: MapId,
        object_id: ObjectId,
        index: usize,
    ) -> Result<()> {
        let handle = self.require_map(map_id).await?;

        let Some(current) = Self::aura_at(&handle, object_id, index).await else {
            return Ok(());
        };

        let action = Action::AuraAddOrRemove(AuraAddOrRemoveAction::removal(
            map_id,
            object_id,
            index,
            current.range,
            current.color,
        ));
        self.submit(client, action).await;
        Ok(())
    }

    /// Overwrites the aura at the given position with new range/color.
    ///
    /// The aura's current values are captured as the action's initial
    /// values, so undo restores the state the gesture started from. A
    /// missing object or index at decision time is a silent no-op.
    #[tracing::instrument(skip(self))]
    pub async fn change_aura(
        &self,
        client: ClientId,
        map_id: MapId,
        object_id: ObjectId,
        index: usize,
        range: f32,
        color: Rgba,
    ) -> Result<()> {
        let handle = self.require_map(map_id).await?;

        let Some(initial) = Self::aura_at(&handle, object_id, index).await else {
            return Ok(());
        };

        let action = Action::AuraChange(AuraChangeAction::new(
            map_id,
            object_id,
            index,
            initial,
            domain::Aura::new(range, color),
        ));
        self.submit(client, action).await;
        Ok(())
    }

    /// Adds a drawing, or replaces the content of an existing one with
    /// the same identifier (continuous stroke updates).
    #[tracing::instrument(skip(self, drawing), fields(drawing_id = %drawing.id))]
    pub async fn upsert_drawing(
        &self,
        client: ClientId,
        map_id: MapId,
        drawing: Drawing,
    ) -> Result<()> {
        self.require_map(map_id).await?;

        let action = Action::Drawing(DrawingAction::new(map_id, drawing));
        self.submit(client, action).await;
        Ok(())
    }

    /// Undoes the client's most recent action.
    ///
    /// Returns true if an undo was performed.
    #[tracing::instrument(skip(self))]
    pub async fn undo(&self, client: ClientId) -> bool {
        let Some(history) = self.existing_history(client).await else {
            return false;
        };
        history.undo().await
    }

    /// Redoes the client's most recently undone action.
    ///
    /// Returns true if a redo was performed.
    #[tracing::instrument(skip(self))]
    pub async fn redo(&self, client: ClientId) -> bool {
        let Some(history) = self.existing_history(client).await else {
            return false;
        };
        history.redo().await
    }

    async fn existing_history(&self, client: ClientId) -> Option<Arc<ActionHistory>> {
        self.histories.read().await.get(&client).cloned()
    }

    async fn submit(&self, client: ClientId, mut action: Action) {
        // forward effect first, so an absorbed small change has already
        // mutated the document exactly once before the merge
        action.redo(&self.context).await;
        self.history_for(client).await.new_action(action).await;
    }

    async fn require_map(&self, map_id: MapId) -> Result<MapHandle> {
        self.context
            .store()
            .get(map_id)
            .await
            .ok_or(HistoryError::MapNotFound { map_id })
    }

    async fn aura_at(
        handle: &MapHandle,
        object_id: ObjectId,
        index: usize,
    ) -> Option<domain::Aura> {
        let map = handle.read().await;
        map.object(object_id).and_then(|o| o.aura(index).copied())
    }
}
