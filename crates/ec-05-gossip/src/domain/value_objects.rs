//! Value objects for gossip configuration and bookkeeping.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::Hash;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

/// Gossip configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GossipConfig {
    /// Period of the push round in ms
    pub interval_ms: u64,
    /// Peers contacted per round and per relay
    pub fanout: usize,
    /// Upper bound for a single send in ms
    pub send_timeout_ms: u64,
    /// Hashes remembered as already handled
    pub seen_cache_size: usize,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            fanout: 3,
            send_timeout_ms: 2_000,
            seen_cache_size: 10_000,
        }
    }
}

impl GossipConfig {
    /// Fast rounds and short timeouts for tests.
    pub fn for_testing() -> Self {
        Self {
            interval_ms: 50,
            send_timeout_ms: 100,
            seen_cache_size: 1_000,
            ..Self::default()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.interval_ms == 0 {
            return Err("interval_ms must be > 0".into());
        }
        if self.fanout == 0 {
            return Err("fanout must be > 0".into());
        }
        if self.send_timeout_ms == 0 {
            return Err("send_timeout_ms must be > 0".into());
        }
        if self.seen_cache_size == 0 {
            return Err("seen_cache_size must be > 0".into());
        }
        Ok(())
    }
}

/// Counters for monitoring.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GossipStats {
    pub rounds: u64,
    pub messages_sent: u64,
    pub send_failures: u64,
    pub transactions_accepted: u64,
    pub blocks_accepted: u64,
    pub rejected: u64,
}

/// Result of one push round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GossipRound {
    /// Peers selected for this round.
    pub targets: usize,
    /// Messages delivered.
    pub sent: usize,
    /// Sends that failed or timed out.
    pub failed: usize,
}

/// Bounded FIFO set of hashes already handled.
///
/// Once full, inserting evicts the oldest entry.
pub struct SeenCache {
    inner: Mutex<SeenInner>,
    max_size: usize,
}

struct SeenInner {
    members: HashSet<Hash>,
    order: VecDeque<Hash>,
}

impl SeenCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(SeenInner {
                members: HashSet::with_capacity(max_size),
                order: VecDeque::with_capacity(max_size),
            }),
            max_size: max_size.max(1),
        }
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.inner.lock().members.contains(hash)
    }

    /// Record `hash`. Returns `false` if it was already present.
    pub fn insert(&self, hash: Hash) -> bool {
        let mut inner = self.inner.lock();
        if inner.members.contains(&hash) {
            return false;
        }
        if inner.order.len() >= self.max_size {
            if let Some(oldest) = inner.order.pop_front() {
                inner.members.remove(&oldest);
            }
        }
        inner.members.insert(hash);
        inner.order.push_back(hash);
        true
    }

    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(n: u8) -> Hash {
        [n; 32]
    }

    #[test]
    fn test_seen_cache_rejects_repeat() {
        let cache = SeenCache::new(10);
        assert!(cache.insert(hash(1)));
        assert!(!cache.insert(hash(1)));
        assert!(cache.contains(&hash(1)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_seen_cache_evicts_oldest() {
        let cache = SeenCache::new(2);
        cache.insert(hash(1));
        cache.insert(hash(2));
        cache.insert(hash(3));

        assert!(!cache.contains(&hash(1)));
        assert!(cache.contains(&hash(2)));
        assert!(cache.contains(&hash(3)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_config_validation() {
        assert!(GossipConfig::default().validate().is_ok());
        assert!(GossipConfig::for_testing().validate().is_ok());

        let config = GossipConfig {
            fanout: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_round_parameters() {
        let config = GossipConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(5));
        assert_eq!(config.fanout, 3);
    }
}
