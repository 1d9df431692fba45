//! K-Bucket implementation for Kademlia routing.

use crate::domain::{RoutingEntry, Timestamp};
use shared_types::NodeId;

/// A k-bucket storing up to k entries at a specific distance range.
///
/// Entries are ordered least-recently-seen first; refreshed entries move to
/// the back.
#[derive(Debug, Clone, Default)]
pub struct KBucket {
    pub(crate) entries: Vec<RoutingEntry>,
    pub(crate) last_updated: Option<Timestamp>,
}

impl KBucket {
    /// Create a new empty k-bucket
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of entries in this bucket
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bucket is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if the bucket is full
    pub fn is_full(&self, k: usize) -> bool {
        self.entries.len() >= k
    }

    /// Least recently seen entry
    pub fn oldest(&self) -> Option<&RoutingEntry> {
        self.entries.first()
    }

    /// All entries in this bucket
    pub fn entries(&self) -> &[RoutingEntry] {
        &self.entries
    }

    /// Last time an entry was added or refreshed
    pub fn last_updated(&self) -> Option<Timestamp> {
        self.last_updated
    }

    pub(crate) fn get(&self, node_id: &NodeId) -> Option<&RoutingEntry> {
        self.entries.iter().find(|e| e.node_id() == node_id)
    }

    pub(crate) fn contains(&self, node_id: &NodeId) -> bool {
        self.get(node_id).is_some()
    }

    /// Append an entry at the most-recently-seen end (assumes not full)
    pub(crate) fn push(&mut self, entry: RoutingEntry) {
        self.last_updated = Some(entry.last_seen);
        self.entries.push(entry);
    }

    pub(crate) fn remove(&mut self, node_id: &NodeId) -> Option<RoutingEntry> {
        self.entries
            .iter()
            .position(|e| e.node_id() == node_id)
            .map(|pos| self.entries.remove(pos))
    }

    /// Replace an existing entry and move it to the most-recently-seen end.
    pub(crate) fn refresh(&mut self, entry: RoutingEntry) -> bool {
        match self.remove(entry.node_id()) {
            Some(_) => {
                self.push(entry);
                true
            }
            None => false,
        }
    }

    /// Drop entries older than the TTL, returning their ids.
    pub(crate) fn evict_stale(&mut self, now: Timestamp, ttl_secs: u64) -> Vec<NodeId> {
        let mut removed = Vec::new();
        self.entries.retain(|e| {
            let stale = e.is_stale(now, ttl_secs);
            if stale {
                removed.push(e.info.node_id);
            }
            !stale
        });
        removed
    }
}
