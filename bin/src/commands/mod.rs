//! CLI command implementations.

pub(crate) mod analyze;
pub(crate) mod export;
pub(crate) mod load;
pub(crate) mod run;
pub(crate) mod serve;
pub(crate) mod stream;
pub(crate) mod symbols;

use anyhow::{Context, Result};
use pairscope_lib::{SqliteTickStore, StoreConfig};

/// Open the tick store described by `config`.
pub(crate) fn open_store(config: &StoreConfig) -> Result<SqliteTickStore> {
    SqliteTickStore::from_config(config)
        .with_context(|| format!("Failed to open tick store at {}", config.path().display()))
}

/// Resolves on Ctrl+C.
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping");
}
