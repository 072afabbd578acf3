//! Per-client bounded log of applied actions.

use common::ClientId;
use tokio::sync::Mutex;

use crate::action::Action;
use crate::context::ActionContext;

/// Default capacity of an action history.
pub const DEFAULT_ACTION_BUFFER_SIZE: usize = 32;

/// Per-client bounded log of applied actions with a current-position
/// cursor.
///
/// The history is owned exclusively by one client session. All three
/// operations run under the history's own lock, and that lock stays
/// held across the invocation of an action's undo/redo, which itself
/// acquires the document lock. The global order is therefore history
/// lock first, document lock second; callers must never hold a
/// document lock when calling into a history.
///
/// Recording an action does not apply it: the caller that constructs
/// and submits an action is responsible for applying its forward
/// effect; insertion logs history only.
pub struct ActionHistory {
    owner: ClientId,
    context: ActionContext,
    state: Mutex<HistoryState>,
}

#[derive(Debug)]
struct HistoryState {
    actions: Vec<Action>,
    /// Position of the most recently applied action; `None` means
    /// nothing is applied (everything undone, or the log is empty).
    cursor: Option<usize>,
    capacity: usize,
}

impl ActionHistory {
    /// Creates a history for a client with the default capacity.
    pub fn new(owner: ClientId, context: ActionContext) -> Self {
        Self::with_buffer_size(owner, context, DEFAULT_ACTION_BUFFER_SIZE)
    }

    /// Creates a history for a client with the given capacity.
    pub fn with_buffer_size(owner: ClientId, context: ActionContext, capacity: usize) -> Self {
        Self {
            owner,
            context,
            state: Mutex::new(HistoryState {
                actions: Vec::new(),
                cursor: None,
                capacity,
            }),
        }
    }

    /// Returns the client this history belongs to.
    pub fn owner(&self) -> ClientId {
        self.owner
    }

    /// Records an already-applied action.
    ///
    /// A small-change action is first offered to the entry at the
    /// cursor; if absorbed, nothing is pushed and the cursor stays put.
    /// Otherwise any redo-able entries after the cursor are discarded
    /// (taking a new action abandons the redo branch), the oldest entry
    /// is evicted if the log is full, and the action is appended with
    /// the cursor pointing at it.
    pub async fn new_action(&self, action: Action) {
        let mut state = self.state.lock().await;

        if action.is_small_change()
            && let Some(cursor) = state.cursor
            && state.actions[cursor].kind() == action.kind()
            && state.actions[cursor].accept_small_change(&action)
        {
            metrics::counter!("history_actions_coalesced").increment(1);
            tracing::trace!(
                owner = %self.owner,
                kind = action.kind().as_str(),
                "action coalesced into pending entry"
            );
            return;
        }

        match state.cursor {
            Some(cursor) => state.actions.truncate(cursor + 1),
            None => state.actions.clear(),
        }

        if state.actions.len() >= state.capacity && !state.actions.is_empty() {
            state.actions.remove(0);
            state.cursor = state.cursor.and_then(|c| c.checked_sub(1));
        }

        state.actions.push(action);
        state.cursor = Some(state.actions.len() - 1);

        metrics::counter!("history_actions_recorded").increment(1);
        tracing::trace!(
            owner = %self.owner,
            len = state.actions.len(),
            "action recorded"
        );
    }

    /// Undoes the action at the cursor.
    ///
    /// Returns false when there is nothing to undo; this is the
    /// terminal no-op state, not an error.
    pub async fn undo(&self) -> bool {
        let mut state = self.state.lock().await;

        let Some(cursor) = state.cursor else {
            tracing::trace!(owner = %self.owner, "undo: nothing to undo");
            return false;
        };

        state.actions[cursor].undo(&self.context).await;
        state.cursor = cursor.checked_sub(1);

        metrics::counter!("history_undos_performed").increment(1);
        tracing::trace!(owner = %self.owner, cursor = ?state.cursor, "undo performed");
        true
    }

    /// Redoes the action after the cursor.
    ///
    /// Returns false when there is no entry after the cursor.
    pub async fn redo(&self) -> bool {
        let mut state = self.state.lock().await;

        let next = match state.cursor {
            Some(cursor) => cursor + 1,
            None => 0,
        };
        if next >= state.actions.len() {
            tracing::trace!(owner = %self.owner, "redo: nothing to redo");
            return false;
        }

        state.actions[next].redo(&self.context).await;
        state.cursor = Some(next);

        metrics::counter!("history_redos_performed").increment(1);
        tracing::trace!(owner = %self.owner, cursor = next, "redo performed");
        true
    }

    /// Changes the maximum buffer size.
    ///
    /// Takes effect lazily on the next insertion's eviction check;
    /// shrinking below the current length does not retroactively evict.
    pub async fn set_buffer_size(&self, size: usize) {
        self.state.lock().await.capacity = size;
    }

    /// Returns the configured maximum buffer size.
    pub async fn buffer_size(&self) -> usize {
        self.state.lock().await.capacity
    }

    /// Returns the number of recorded actions.
    pub async fn len(&self) -> usize {
        self.state.lock().await.actions.len()
    }

    /// Returns true if no actions are recorded.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.actions.is_empty()
    }

    /// Returns the cursor position, if any action is applied.
    pub async fn cursor(&self) -> Option<usize> {
        self.state.lock().await.cursor
    }

    /// Returns true if an undo would perform work.
    pub async fn can_undo(&self) -> bool {
        self.state.lock().await.cursor.is_some()
    }

    /// Returns true if a redo would perform work.
    pub async fn can_redo(&self) -> bool {
        let state = self.state.lock().await;
        let next = match state.cursor {
            Some(cursor) => cursor + 1,
            None => 0,
        };
        next < state.actions.len()
    }
}
