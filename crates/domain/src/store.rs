use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::MapId;
use tokio::sync::RwLock;

use crate::map::Map;

/// The lock handle through which a map's owned collections are mutated.
///
/// Lock ordering is fixed: a caller that needs both must take its action
/// history lock first and the map's write lock second, never the
/// reverse.
pub type MapHandle = Arc<RwLock<Map>>;

/// Looks up map documents by identifier.
///
/// The store owns the documents; everything else holds plain
/// identifiers and resolves them here at apply time, so an action's
/// lifetime stays independent of the document's.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the lock handle for the map with the given identifier.
    async fn get(&self, id: MapId) -> Option<MapHandle>;

    /// Adds a map to the store, returning its lock handle.
    async fn insert(&self, map: Map) -> MapHandle;

    /// Removes the map with the given identifier.
    ///
    /// Returns true if a map was removed.
    async fn remove(&self, id: MapId) -> bool;

    /// Returns true if a map with the given identifier is present.
    async fn contains(&self, id: MapId) -> bool;

    /// Returns the number of stored maps.
    async fn map_count(&self) -> usize;
}

/// In-memory document store.
#[derive(Clone, Default)]
pub struct InMemoryMapStore {
    maps: Arc<RwLock<HashMap<MapId, MapHandle>>>,
}

impl InMemoryMapStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryMapStore {
    async fn get(&self, id: MapId) -> Option<MapHandle> {
        self.maps.read().await.get(&id).cloned()
    }

    async fn insert(&self, map: Map) -> MapHandle {
        let id = map.id();
        let handle = Arc::new(RwLock::new(map));
        self.maps.write().await.insert(id, Arc::clone(&handle));
        handle
    }

    async fn remove(&self, id: MapId) -> bool {
        self.maps.write().await.remove(&id).is_some()
    }

    async fn contains(&self, id: MapId) -> bool {
        self.maps.read().await.contains_key(&id)
    }

    async fn map_count(&self) -> usize {
        self.maps.read().await.len()
    }
}
