//! Serve command implementation.

use super::{open_store, shutdown_signal};
use anyhow::{Context, Result};
use pairscope_lib::AppState;
use pairscope_lib::prelude::*;
use std::sync::Arc;

/// Serve the HTTP API until Ctrl+C.
pub(crate) async fn serve(store_config: &StoreConfig, config: &ServerConfig) -> Result<()> {
    let store = Arc::new(open_store(store_config)?);
    let state = AppState::new(store, store_config.snapshot_limit);

    println!("Serving on http://{}:{}", config.bind, config.port);
    pairscope_lib::serve(config, state, shutdown_signal())
        .await
        .context("HTTP server failed")
}
