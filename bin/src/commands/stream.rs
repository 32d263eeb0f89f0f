//! Stream command implementation.

use super::{open_store, shutdown_signal};
use anyhow::Result;
use pairscope_lib::run_ingestion;
use pairscope_lib::prelude::*;
use std::sync::Arc;

/// Ingest live trades until Ctrl+C.
pub(crate) async fn stream(store_config: &StoreConfig, config: &StreamConfig) -> Result<()> {
    let store = Arc::new(open_store(store_config)?);

    println!("Streaming {} (Ctrl+C to stop)", config.url());
    let summary = run_ingestion(config, store, shutdown_signal()).await;

    println!(
        "Stored {} ticks ({} messages skipped, {} reconnects)",
        summary.ticks, summary.skipped, summary.reconnects
    );
    Ok(())
}
