//! Shared apply context handed to actions.

use std::sync::Arc;

use broadcast::BroadcastSink;
use domain::DocumentStore;

/// The route from an action to its document and the broadcast sink.
///
/// Actions hold plain identifiers; the context resolves them at apply
/// time, so an action's lifetime stays independent of the documents it
/// mutates.
#[derive(Clone)]
pub struct ActionContext {
    store: Arc<dyn DocumentStore>,
    sink: Arc<dyn BroadcastSink>,
}

impl ActionContext {
    /// Creates a context over a document store and a broadcast sink.
    pub fn new(store: Arc<dyn DocumentStore>, sink: Arc<dyn BroadcastSink>) -> Self {
        Self { store, sink }
    }

    /// Returns the document store.
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Returns the broadcast sink.
    pub fn sink(&self) -> &dyn BroadcastSink {
        self.sink.as_ref()
    }
}
