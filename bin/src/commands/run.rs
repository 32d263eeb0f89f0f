//! Run command implementation.
//!
//! Runs live ingestion and the HTTP API side by side over one store.

use super::{open_store, shutdown_signal};
use anyhow::{Context, Result};
use pairscope_lib::prelude::*;
use pairscope_lib::{AppState, run_ingestion};
use std::sync::Arc;

/// Ingest and serve until Ctrl+C.
pub(crate) async fn run(
    store_config: &StoreConfig,
    stream_config: &StreamConfig,
    server_config: &ServerConfig,
) -> Result<()> {
    let store = Arc::new(open_store(store_config)?);
    let state = AppState::new(store.clone(), store_config.snapshot_limit);

    println!(
        "Streaming {} and serving on http://{}:{} (Ctrl+C to stop)",
        stream_config.url(),
        server_config.bind,
        server_config.port
    );

    let ingestion = run_ingestion(stream_config, store, shutdown_signal());
    let server = pairscope_lib::serve(server_config, state, shutdown_signal());
    let (summary, served) = tokio::join!(ingestion, server);

    println!(
        "Stored {} ticks ({} messages skipped, {} reconnects)",
        summary.ticks, summary.skipped, summary.reconnects
    );
    served.context("HTTP server failed")
}
