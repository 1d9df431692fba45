//! # Node Configuration
//!
//! One aggregate over every component's config. Sources, lowest precedence
//! first:
//!
//! 1. `Default` for every section
//! 2. an optional TOML file (`NodeConfig::from_file`)
//! 3. `EC_*` environment variables (`apply_env_overrides`)
//!
//! `validate` runs last and rejects inconsistent combinations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared_types::NodeId;
use thiserror::Error;

use ec_01_peer_routing::RoutingConfig;
use ec_02_ledger::LedgerConfig;
use ec_03_mempool::MempoolConfig;
use ec_04_miner::MinerConfig;
use ec_05_gossip::GossipConfig;
use ec_06_chain_sync::SyncConfig;

use crate::genesis::GenesisConfig;

/// Environment variable names understood by `apply_env_overrides`.
pub mod env {
    pub const NODE_ID: &str = "EC_NODE_ID";
    pub const DATA_DIR: &str = "EC_DATA_DIR";
    pub const MINING_ENABLED: &str = "EC_MINING_ENABLED";
    pub const REWARD_ADDRESS: &str = "EC_REWARD_ADDRESS";
    pub const MIN_DIFFICULTY: &str = "EC_MIN_DIFFICULTY";
    pub const MEMPOOL_MAX: &str = "EC_MEMPOOL_MAX";
    pub const GOSSIP_INTERVAL_SECS: &str = "EC_GOSSIP_INTERVAL_SECS";
    pub const SYNC_INTERVAL_SECS: &str = "EC_SYNC_INTERVAL_SECS";
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A section failed its own validation.
    #[error("invalid [{section}] configuration: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },

    /// An environment override could not be parsed.
    #[error("cannot parse {var}={value:?}")]
    InvalidOverride { var: &'static str, value: String },

    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `NodeConfig`.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Identity and storage location of this node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    /// 40 hex chars are used verbatim; anything else is hashed into an id.
    pub node_id: String,
    /// Address advertised to peers.
    pub listen_address: String,
    /// Directory for persistent storage. `None` keeps the chain in memory.
    pub data_dir: Option<PathBuf>,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            node_id: "ember-node".to_string(),
            listen_address: "127.0.0.1:7070".to_string(),
            data_dir: None,
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub node: NodeSettings,
    pub genesis: GenesisConfig,
    pub ledger: LedgerConfig,
    pub mempool: MempoolConfig,
    pub miner: MinerConfig,
    pub gossip: GossipConfig,
    pub sync: SyncConfig,
    pub routing: RoutingConfig,
}

impl NodeConfig {
    /// Fast intervals and cheap proof-of-work. Mining stays off.
    pub fn for_testing(node_id: impl Into<String>) -> Self {
        Self {
            node: NodeSettings {
                node_id: node_id.into(),
                listen_address: "local".to_string(),
                data_dir: None,
            },
            genesis: GenesisConfig::default(),
            ledger: LedgerConfig::for_testing(),
            mempool: MempoolConfig::for_testing(),
            miner: MinerConfig {
                enabled: false,
                block_interval_ms: 20,
                ..MinerConfig::for_testing()
            },
            gossip: GossipConfig::for_testing(),
            sync: SyncConfig::for_testing(),
            routing: RoutingConfig::for_testing(),
        }
    }

    /// Parse a TOML document. Missing sections keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Defaults (or `path`), then environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `EC_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup(env::NODE_ID) {
            self.node.node_id = id;
        }
        if let Some(dir) = lookup(env::DATA_DIR) {
            self.node.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup(env::MINING_ENABLED) {
            self.miner.enabled = parse_flag(env::MINING_ENABLED, &raw)?;
        }
        if let Some(address) = lookup(env::REWARD_ADDRESS) {
            self.miner.reward_address = address;
        }
        if let Some(raw) = lookup(env::MIN_DIFFICULTY) {
            let min: u32 = parse_number(env::MIN_DIFFICULTY, &raw)?;
            self.ledger.min_difficulty = min;
            self.ledger.difficulty = self.ledger.difficulty.max(min);
        }
        if let Some(raw) = lookup(env::MEMPOOL_MAX) {
            self.mempool.max_size = parse_number(env::MEMPOOL_MAX, &raw)?;
        }
        if let Some(raw) = lookup(env::GOSSIP_INTERVAL_SECS) {
            let secs: u64 = parse_number(env::GOSSIP_INTERVAL_SECS, &raw)?;
            self.gossip.interval_ms = secs.saturating_mul(1_000);
        }
        if let Some(raw) = lookup(env::SYNC_INTERVAL_SECS) {
            let secs: u64 = parse_number(env::SYNC_INTERVAL_SECS, &raw)?;
            self.sync.interval_ms = secs.saturating_mul(1_000);
        }
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn section(name: &'static str, result: Result<(), String>) -> Result<(), ConfigError> {
            result.map_err(|reason| ConfigError::Invalid {
                section: name,
                reason,
            })
        }

        if self.node.node_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                section: "node",
                reason: "node_id must not be empty".into(),
            });
        }
        section("genesis", self.genesis.validate().map_err(|e| e.to_string()))?;
        section("ledger", self.ledger.validate())?;
        if self.mempool.max_size == 0 {
            return Err(ConfigError::Invalid {
                section: "mempool",
                reason: "max_size must be positive".into(),
            });
        }
        section("miner", self.miner.validate())?;
        section("gossip", self.gossip.validate())?;
        section("sync", self.sync.validate())?;
        if self.routing.k == 0 {
            return Err(ConfigError::Invalid {
                section: "routing",
                reason: "k must be positive".into(),
            });
        }
        Ok(())
    }

    /// The routing identity derived from `node.node_id`.
    pub fn node_id(&self) -> NodeId {
        let raw = self.node.node_id.trim();
        NodeId::from_hex(raw).unwrap_or_else(|| NodeId::derive(raw.as_bytes()))
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidOverride {
        var,
        value: raw.to_string(),
    })
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidOverride {
            var,
            value: raw.to_string(),
        }),
    }
}
