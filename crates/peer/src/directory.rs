//! Per-peer signaling state for one meeting

use std::collections::HashMap;

use serde_json::Value;

use skillswap_shared::ConnectionId;

/// What the caller should do with an ICE candidate it just received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateDisposition {
    /// Remote description is set; apply the candidate now
    Apply,
    /// Remote description not set yet; the candidate was queued
    Queued,
}

/// Signaling state for a single remote peer
#[derive(Debug, Default)]
struct PeerSession {
    user_name: Option<String>,
    /// True once the remote description has been applied
    remote_ready: bool,
    /// Candidates that arrived before the remote description, in arrival order
    pending_candidates: Vec<Value>,
    /// True when this client sends the offer toward the peer
    initiator: bool,
}

/// Tracks every remote peer in the meeting this client is part of
///
/// The joining client offers to each existing occupant; occupants wait for
/// the newcomer's offer. ICE candidates that outrun the offer/answer
/// exchange are held until [`remote_description_set`] and replayed in
/// arrival order, exactly once.
///
/// [`remote_description_set`]: PeerDirectory::remote_description_set
#[derive(Debug, Default)]
pub struct PeerDirectory {
    peers: HashMap<ConnectionId, PeerSession>,
}

impl PeerDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the occupants from the join snapshot
    ///
    /// Returns the peers this client must send offers to. Occupants already
    /// known keep their state.
    pub fn on_room_snapshot(&mut self, occupants: &[ConnectionId]) -> Vec<ConnectionId> {
        let mut offer_targets = Vec::with_capacity(occupants.len());
        for peer in occupants {
            let session = self.peers.entry(*peer).or_default();
            session.initiator = true;
            offer_targets.push(*peer);
        }
        tracing::debug!(peer_count = offer_targets.len(), "Room snapshot applied");
        offer_targets
    }

    /// Record a peer that joined after this client
    ///
    /// The newcomer initiates, so this side just waits for their offer.
    pub fn on_peer_joined(&mut self, peer: ConnectionId) {
        let session = self.peers.entry(peer).or_default();
        session.initiator = false;
    }

    /// True when this client sends the offer toward the peer
    pub fn is_initiator(&self, peer: ConnectionId) -> bool {
        self.peers
            .get(&peer)
            .map(|session| session.initiator)
            .unwrap_or(false)
    }

    /// Attach a display name to a peer
    pub fn set_peer_name(&mut self, peer: ConnectionId, user_name: impl Into<String>) {
        let session = self.peers.entry(peer).or_default();
        session.user_name = Some(user_name.into());
    }

    /// Display name for a peer, if one arrived
    pub fn peer_name(&self, peer: ConnectionId) -> Option<&str> {
        self.peers
            .get(&peer)
            .and_then(|session| session.user_name.as_deref())
    }

    /// Take in an ICE candidate from a peer
    ///
    /// Candidates may arrive for peers the directory has not seen yet; a
    /// session is created on the spot so nothing is lost.
    pub fn add_candidate(&mut self, peer: ConnectionId, candidate: Value) -> CandidateDisposition {
        let session = self.peers.entry(peer).or_default();
        if session.remote_ready {
            return CandidateDisposition::Apply;
        }
        session.pending_candidates.push(candidate);
        tracing::debug!(
            peer = %peer,
            queued = session.pending_candidates.len(),
            "Queued ICE candidate until remote description"
        );
        CandidateDisposition::Queued
    }

    /// Mark the peer's remote description as applied and drain its queue
    ///
    /// Returns the held candidates in arrival order. Later calls return
    /// nothing; candidates are replayed exactly once.
    pub fn remote_description_set(&mut self, peer: ConnectionId) -> Vec<Value> {
        let session = self.peers.entry(peer).or_default();
        session.remote_ready = true;
        let drained = std::mem::take(&mut session.pending_candidates);
        if !drained.is_empty() {
            tracing::debug!(peer = %peer, count = drained.len(), "Replaying queued ICE candidates");
        }
        drained
    }

    /// Forget a peer, discarding any still-queued candidates
    pub fn remove_peer(&mut self, peer: ConnectionId) -> bool {
        self.peers.remove(&peer).is_some()
    }

    /// Number of tracked peers
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Drop all peer state, used when leaving the meeting
    pub fn clear(&mut self) {
        self.peers.clear();
    }
}
