use std::collections::HashMap;

use libp2p::{Multiaddr, PeerId};

/// The set of currently open peer links.
///
/// Entries are added when a connection is established and removed when the
/// transport reports close or error; broadcast targets exactly this set.
/// Keyed by peer identity, so re-registering an existing link is a no-op
/// rather than a duplicate.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashMap<PeerId, Multiaddr>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open link to `peer_id` at `addr`.
    pub fn insert(&mut self, peer_id: PeerId, addr: Multiaddr) {
        self.peers.insert(peer_id, addr);
    }

    /// Drop the link to `peer_id`.  Returns `false` if it was not registered.
    pub fn remove(&mut self, peer_id: &PeerId) -> bool {
        self.peers.remove(peer_id).is_some()
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.peers.contains_key(peer_id)
    }

    /// Snapshot of all connected peer ids, in no particular order.
    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.peers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
