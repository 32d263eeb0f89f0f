//! Load command implementation.

use super::open_store;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pairscope_lib::ingest_csv;
use pairscope_lib::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Bulk load a CSV file into the tick store.
pub(crate) async fn load(config: &StoreConfig, file: &Path, quiet: bool) -> Result<()> {
    let store = Arc::new(open_store(config)?);
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file name: {}", file.display()))?;

    let reader = tokio::fs::File::open(file)
        .await
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
        );
        pb.set_message(format!("Loading {file_name}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let summary = match ingest_csv(store, file_name, reader).await {
        Ok(summary) => summary,
        Err(e) => {
            progress.abandon_with_message(format!("Rejected {file_name}"));
            return Err(e.into());
        }
    };
    progress.finish_with_message(summary.message());

    if !quiet && summary.dropped > 0 {
        println!("Skipped {} unparseable rows", summary.dropped);
    }
    Ok(())
}
