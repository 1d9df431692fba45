//! # Ember-Chain Node
//!
//! Usage: `node-runtime [CONFIG.toml]`
//!
//! Without a file the defaults apply. `EC_*` environment variables override
//! either (see `container::config::env`). `RUST_LOG` selects log levels.

use std::path::PathBuf;

use anyhow::{Context, Result};
use node_runtime::{NodeBuilder, NodeConfig};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_target(true)
        .with_thread_ids(true);

    if std::env::var_os("RUST_LOG").is_some() {
        let filter = EnvFilter::try_from_default_env().context("invalid RUST_LOG")?;
        tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.with_max_level(Level::INFO).finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = NodeConfig::load(path.as_deref()).with_context(|| match &path {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading default configuration".to_string(),
    })?;

    let node = NodeBuilder::new(config)
        .build()
        .await
        .context("assembling node")?;
    node.start().await;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    node.shutdown().await;
    Ok(())
}
