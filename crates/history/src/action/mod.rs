//! Reversible actions against the map document.
//!
//! Actions are a closed set of variants, each knowing how to apply its
//! forward effect ([`Action::redo`]) and its inverse ([`Action::undo`])
//! against the document, broadcasting the resulting delta as the last
//! step while the document write lock is held.
//!
//! Preconditions are re-validated before every apply: concurrent
//! requests may have altered the document between decision time and
//! apply time, so a failed precondition is a silent no-op, never an
//! error. A skipped apply mutates nothing and broadcasts nothing.

mod aura;
mod drawing;
mod turn_entry;

use std::time::Duration;

pub use aura::{AuraAddOrRemoveAction, AuraChangeAction};
pub use drawing::DrawingAction;
pub use turn_entry::AddTurnEntryAction;

use crate::context::ActionContext;

/// Window within which consecutive small-change actions of the same
/// kind merge into one history entry.
pub const SMALL_CHANGE_WINDOW: Duration = Duration::from_millis(3000);

/// Discriminant tag for action variants.
///
/// Used to decide whether two consecutive actions from the same client
/// may coalesce: only same-tag pairs are ever compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionKind {
    /// Uninitialized tag; no action variant produces it.
    #[default]
    Unknown,
    AddDrawing,
    AddTurnEntry,
    AuraAddOrRemove,
    AuraChange,
}

impl ActionKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Unknown => "Unknown",
            ActionKind::AddDrawing => "AddDrawing",
            ActionKind::AddTurnEntry => "AddTurnEntry",
            ActionKind::AuraAddOrRemove => "AuraAddOrRemove",
            ActionKind::AuraChange => "AuraChange",
        }
    }
}

/// A recorded, reversible mutation against a map document.
#[derive(Debug, Clone)]
pub enum Action {
    AddTurnEntry(AddTurnEntryAction),
    AuraAddOrRemove(AuraAddOrRemoveAction),
    AuraChange(AuraChangeAction),
    Drawing(DrawingAction),
}

impl Action {
    /// Returns the action's discriminant tag.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::AddTurnEntry(_) => ActionKind::AddTurnEntry,
            Action::AuraAddOrRemove(_) => ActionKind::AuraAddOrRemove,
            Action::AuraChange(_) => ActionKind::AuraChange,
            Action::Drawing(_) => ActionKind::AddDrawing,
        }
    }

    /// Returns true if this action represents a continuous-adjustment
    /// gesture eligible to merge with the pending entry.
    pub fn is_small_change(&self) -> bool {
        matches!(self, Action::AuraChange(_) | Action::Drawing(_))
    }

    /// Applies the action's forward effect.
    ///
    /// Mutates the document, marks it dirty, and broadcasts the delta to
    /// every session viewing it. Safe against a state that has already
    /// diverged: the precondition is re-checked and a stale apply is
    /// silently skipped.
    pub async fn redo(&mut self, ctx: &ActionContext) {
        match self {
            Action::AddTurnEntry(action) => action.redo(ctx).await,
            Action::AuraAddOrRemove(action) => action.redo(ctx).await,
            Action::AuraChange(action) => action.redo(ctx).await,
            Action::Drawing(action) => action.redo(ctx).await,
        }
    }

    /// Applies the action's inverse effect, with the same re-validation
    /// and broadcast discipline as [`Action::redo`].
    pub async fn undo(&mut self, ctx: &ActionContext) {
        match self {
            Action::AddTurnEntry(action) => action.undo(ctx).await,
            Action::AuraAddOrRemove(action) => action.undo(ctx).await,
            Action::AuraChange(action) => action.undo(ctx).await,
            Action::Drawing(action) => action.undo(ctx).await,
        }
    }

    /// Attempts to absorb an incoming small-change action into this one.
    ///
    /// Returns true if the merge happened; the incoming action must then
    /// not be pushed as a separate history entry. Only same-kind pairs
    /// ever merge.
    pub fn accept_small_change(&mut self, incoming: &Action) -> bool {
        match (self, incoming) {
            (Action::AuraChange(pending), Action::AuraChange(incoming)) => {
                pending.absorb(incoming)
            }
            (Action::Drawing(pending), Action::Drawing(incoming)) => pending.absorb(incoming),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{MapId, ObjectId};
    use domain::{Aura, Rgba};

    #[test]
    fn kind_maps_variants_to_tags() {
        let action = Action::AuraChange(AuraChangeAction::new(
            MapId::new(),
            ObjectId::new(),
            0,
            Aura::new(1.0, Rgba::RED),
            Aura::new(2.0, Rgba::BLUE),
        ));
        assert_eq!(action.kind(), ActionKind::AuraChange);
        assert!(action.is_small_change());
    }

    #[test]
    fn default_kind_is_unknown() {
        assert_eq!(ActionKind::default(), ActionKind::Unknown);
        assert_eq!(ActionKind::default().as_str(), "Unknown");
    }

    #[test]
    fn cross_kind_actions_never_merge() {
        let map_id = MapId::new();
        let object_id = ObjectId::new();
        let mut pending = Action::AuraChange(AuraChangeAction::new(
            map_id,
            object_id,
            0,
            Aura::new(1.0, Rgba::RED),
            Aura::new(2.0, Rgba::BLUE),
        ));
        let incoming = Action::AuraAddOrRemove(AuraAddOrRemoveAction::addition(
            map_id,
            object_id,
            3.0,
            Rgba::WHITE,
        ));

        assert!(!pending.accept_small_change(&incoming));
    }
}
