//! Directory of connected sessions.

use std::collections::HashMap;
use std::sync::Arc;

use common::{ClientId, MapId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::delta::MapDelta;

/// Unique identifier for a connected session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a session ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct Session {
    client: ClientId,
    viewing: Option<MapId>,
    sender: mpsc::UnboundedSender<MapDelta>,
}

/// Registry of connected sessions and what each is viewing.
///
/// Each session registers an unbounded delta channel; delivery is a
/// non-blocking send, so the directory never blocks a caller on
/// network I/O. Sessions whose receiver has been dropped are pruned
/// on the next delivery attempt.
#[derive(Clone, Default)]
pub struct SessionDirectory {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session for a client, returning its identifier.
    ///
    /// The session starts viewing nothing.
    pub async fn register(
        &self,
        client: ClientId,
        sender: mpsc::UnboundedSender<MapDelta>,
    ) -> SessionId {
        let id = SessionId::new();
        let session = Session {
            client,
            viewing: None,
            sender,
        };
        self.sessions.write().await.insert(id, session);
        tracing::debug!(session = %id, %client, "session registered");
        id
    }

    /// Points a session at a map (or at nothing).
    ///
    /// Returns false if the session is not registered.
    pub async fn set_viewing(&self, id: SessionId, map: Option<MapId>) -> bool {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&id) {
            session.viewing = map;
            true
        } else {
            false
        }
    }

    /// Removes a session from the directory.
    ///
    /// Returns true if a session was removed.
    pub async fn unregister(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::debug!(session = %id, "session unregistered");
        }
        removed
    }

    /// Returns the client a session belongs to, if registered.
    pub async fn client_of(&self, id: SessionId) -> Option<ClientId> {
        self.sessions.read().await.get(&id).map(|s| s.client)
    }

    /// Returns the number of registered sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub(crate) async fn send_matching<F>(&self, delta: &MapDelta, matches: F) -> usize
    where
        F: Fn(ClientId, Option<MapId>) -> bool,
    {
        let mut sessions = self.sessions.write().await;
        let mut dead = Vec::new();
        let mut delivered = 0;

        for (id, session) in sessions.iter() {
            if !matches(session.client, session.viewing) {
                continue;
            }
            if session.sender.send(delta.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*id);
            }
        }

        for id in dead {
            sessions.remove(&id);
            tracing::debug!(session = %id, "pruned dead session");
        }

        delivered
    }
}
