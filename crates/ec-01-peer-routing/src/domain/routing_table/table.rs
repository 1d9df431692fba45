//! Main RoutingTable implementation.

use crate::domain::{
    calculate_bucket_index, xor_distance, NodeMetadata, RoutingConfig, RoutingEntry, RoutingError,
    Timestamp, NUM_BUCKETS,
};
use shared_types::{NodeId, PeerInfo};
use tracing::debug;

use super::bucket::KBucket;

/// Outcome of inserting a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New entry stored.
    Inserted,
    /// Entry already present; contact info and last-seen refreshed.
    Refreshed,
    /// Bucket was full; a stale entry was evicted to make room.
    ReplacedStale(NodeId),
}

/// Kademlia routing table with 160 k-buckets keyed by XOR distance bit-length.
#[derive(Debug)]
pub struct RoutingTable {
    local_node_id: NodeId,
    buckets: Vec<KBucket>,
    config: RoutingConfig,
}

impl RoutingTable {
    /// Create a new routing table
    pub fn new(local_node_id: NodeId, config: RoutingConfig) -> Self {
        Self {
            local_node_id,
            buckets: (0..NUM_BUCKETS).map(|_| KBucket::new()).collect(),
            config,
        }
    }

    /// Get our local node ID
    pub fn local_node_id(&self) -> &NodeId {
        &self.local_node_id
    }

    /// Get the configuration
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Total entries across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(KBucket::len).sum()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(KBucket::is_empty)
    }

    /// Get a reference to a bucket by index
    pub fn bucket(&self, index: usize) -> Option<&KBucket> {
        self.buckets.get(index)
    }

    fn bucket_mut_for(&mut self, node_id: &NodeId) -> &mut KBucket {
        let idx = calculate_bucket_index(&self.local_node_id, node_id);
        // calculate_bucket_index is clamped to NUM_BUCKETS - 1
        &mut self.buckets[idx]
    }

    fn bucket_for(&self, node_id: &NodeId) -> &KBucket {
        &self.buckets[calculate_bucket_index(&self.local_node_id, node_id)]
    }

    /// Insert a node.
    ///
    /// A known node is refreshed instead. When the bucket is full, the least
    /// recently seen entry is replaced only if it is stale.
    pub fn add_node(
        &mut self,
        info: PeerInfo,
        metadata: NodeMetadata,
        now: Timestamp,
    ) -> Result<InsertOutcome, RoutingError> {
        if info.node_id == self.local_node_id {
            return Err(RoutingError::SelfInsertion);
        }

        let k = self.config.k;
        let ttl = self.config.node_ttl_secs;
        let bucket_idx = calculate_bucket_index(&self.local_node_id, &info.node_id);
        let bucket = self.bucket_mut_for(&info.node_id);
        let entry = RoutingEntry::new(info, metadata, now);

        if bucket.refresh(entry.clone()) {
            return Ok(InsertOutcome::Refreshed);
        }

        if !bucket.is_full(k) {
            bucket.push(entry);
            return Ok(InsertOutcome::Inserted);
        }

        let stale = bucket
            .oldest()
            .filter(|oldest| oldest.is_stale(now, ttl))
            .map(|oldest| oldest.info.node_id);

        match stale {
            Some(evicted) => {
                bucket.remove(&evicted);
                bucket.push(entry);
                debug!("[routing] Bucket {} full, replaced stale node {}", bucket_idx, evicted);
                Ok(InsertOutcome::ReplacedStale(evicted))
            }
            None => Err(RoutingError::BucketFull { bucket: bucket_idx }),
        }
    }

    /// Upsert: update a known node, otherwise add it.
    pub fn update_node(
        &mut self,
        info: PeerInfo,
        metadata: NodeMetadata,
        now: Timestamp,
    ) -> Result<InsertOutcome, RoutingError> {
        self.add_node(info, metadata, now)
    }

    /// Mark a known node as seen without changing its contact info.
    pub fn touch_node(&mut self, node_id: &NodeId, now: Timestamp) -> Result<(), RoutingError> {
        let bucket = self.bucket_mut_for(node_id);
        let mut entry = bucket
            .get(node_id)
            .cloned()
            .ok_or(RoutingError::NodeNotFound(*node_id))?;
        entry.last_seen = now;
        bucket.refresh(entry);
        Ok(())
    }

    /// Remove a node, returning its entry.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Option<RoutingEntry> {
        self.bucket_mut_for(node_id).remove(node_id)
    }

    /// Look up a node.
    pub fn get_node(&self, node_id: &NodeId) -> Option<&RoutingEntry> {
        self.bucket_for(node_id).get(node_id)
    }

    /// Whether a node is present.
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.bucket_for(node_id).contains(node_id)
    }

    /// Up to `count` entries in ascending XOR distance to `target`.
    pub fn get_closest_nodes(&self, target: &NodeId, count: usize) -> Vec<RoutingEntry> {
        let mut all: Vec<_> = self
            .buckets
            .iter()
            .flat_map(|b| b.entries().iter())
            .map(|e| (xor_distance(e.node_id(), target), e))
            .collect();

        all.sort_by(|a, b| a.0.cmp(&b.0));

        all.into_iter()
            .take(count)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Every entry, bucket by bucket.
    pub fn all_nodes(&self) -> Vec<RoutingEntry> {
        self.buckets
            .iter()
            .flat_map(|b| b.entries().iter().cloned())
            .collect()
    }

    /// Remove every entry whose last-seen exceeds the TTL.
    pub fn cleanup_stale_nodes(&mut self, now: Timestamp) -> Vec<NodeId> {
        let ttl = self.config.node_ttl_secs;
        self.buckets
            .iter_mut()
            .flat_map(|b| b.evict_stale(now, ttl))
            .collect()
    }
}
