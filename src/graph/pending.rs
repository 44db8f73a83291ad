//! Bookkeeping for fire-and-forget position writes.
//!
//! Node moves are the one mutation dispatched without awaiting the server.
//! Each dispatch is recorded here keyed by node id; the outcome that comes
//! back over the workbench's channel either drains the entry (success) or
//! marks it failed so a later reconciliation pass can retry instead of
//! losing the write silently. Only the newest write per node is tracked;
//! an older in-flight write resolving after a newer dispatch is ignored.

use rustc_hash::FxHashMap;

use crate::api::ApiError;
use crate::types::{NodeId, Position};

/// State of one tracked position write.
#[derive(Clone, Debug, PartialEq)]
pub enum WriteState {
    /// Dispatched, outcome not yet observed.
    InFlight,
    /// The server rejected or the transport failed; eligible for retry.
    Failed { message: String },
}

/// One tracked position write.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingWrite {
    pub position: Position,
    pub state: WriteState,
}

/// Outcome of a background position write, reported back to the pump.
#[derive(Debug)]
pub struct MoveOutcome {
    pub node_id: NodeId,
    pub position: Position,
    pub result: Result<(), ApiError>,
}

/// Pending position writes, keyed by node id.
#[derive(Debug, Default)]
pub struct PendingMoves {
    map: FxHashMap<NodeId, PendingWrite>,
}

impl PendingMoves {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly dispatched write, superseding any older entry
    /// for the same node.
    pub fn record_dispatch(&mut self, node_id: NodeId, position: Position) {
        self.map.insert(
            node_id,
            PendingWrite {
                position,
                state: WriteState::InFlight,
            },
        );
    }

    /// Drains the entry when the acknowledged write is still the newest
    /// one for its node. Returns `true` when an entry was removed.
    pub fn resolve_success(&mut self, node_id: NodeId, position: Position) -> bool {
        match self.map.get(&node_id) {
            Some(entry) if entry.position == position => {
                self.map.remove(&node_id);
                true
            }
            _ => false,
        }
    }

    /// Marks the entry failed when the rejected write is still the newest
    /// one for its node.
    pub fn resolve_failure(&mut self, node_id: NodeId, position: Position, message: String) {
        if let Some(entry) = self.map.get_mut(&node_id) {
            if entry.position == position {
                entry.state = WriteState::Failed { message };
            }
        }
    }

    /// The writes eligible for an explicit retry pass.
    #[must_use]
    pub fn failed(&self) -> Vec<(NodeId, Position)> {
        self.map
            .iter()
            .filter(|(_, entry)| matches!(entry.state, WriteState::Failed { .. }))
            .map(|(id, entry)| (*id, entry.position))
            .collect()
    }

    /// Drops tracking for a node (e.g. the node was deleted).
    pub fn forget(&mut self, node_id: NodeId) {
        self.map.remove(&node_id);
    }

    #[must_use]
    pub fn get(&self, node_id: NodeId) -> Option<&PendingWrite> {
        self.map.get(&node_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
