//! Broadcast sink seam.

use async_trait::async_trait;
use common::MapId;

use crate::delta::MapDelta;
use crate::session::SessionDirectory;

/// Predicate over connected sessions, selecting delivery targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFilter {
    /// Sessions currently viewing the given document.
    ViewingMap(MapId),

    /// Every connected session.
    All,
}

/// Delivers deltas to matching sessions.
///
/// Delivery is fire-and-forget: no acknowledgment, no error surface.
/// Implementations must not block the caller on network I/O, because
/// the history layer broadcasts while holding the document lock.
#[async_trait]
pub trait BroadcastSink: Send + Sync {
    /// Delivers a delta to every session matching the filter.
    async fn deliver(&self, delta: MapDelta, filter: SessionFilter);
}

#[async_trait]
impl BroadcastSink for SessionDirectory {
    async fn deliver(&self, delta: MapDelta, filter: SessionFilter) {
        let delivered = match filter {
            SessionFilter::ViewingMap(map_id) => {
                self.send_matching(&delta, |_, viewing| viewing == Some(map_id))
                    .await
            }
            SessionFilter::All => self.send_matching(&delta, |_, _| true).await,
        };

        metrics::counter!("broadcast_deltas_delivered").increment(delivered as u64);
        tracing::trace!(
            delta_type = delta.delta_type(),
            map_id = %delta.map_id(),
            delivered,
            "delta broadcast"
        );
    }
}
