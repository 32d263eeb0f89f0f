//! Analyze command implementation.
//!
//! Runs the pipeline over the current snapshot and prints the metrics, or the
//! full chart response as JSON.

use super::open_store;
use crate::display::print_report;
use anyhow::{Context, Result, bail};
use inquire::Select;
use pairscope_lib::prelude::*;

/// Compute and print analytics for a pair, prompting for missing symbols.
#[allow(clippy::too_many_arguments)]
pub(crate) fn analyze(
    config: &StoreConfig,
    s1: Option<String>,
    s2: Option<String>,
    interval: Interval,
    window: usize,
    regression: RegressionType,
    adf: bool,
    json: bool,
) -> Result<()> {
    let store = open_store(config)?;

    let (s1, s2) = match (s1, s2) {
        (Some(s1), Some(s2)) => (s1, s2),
        (s1, _) => select_pair(&store, config.snapshot_limit, s1)?,
    };

    let request = AnalyticsRequest::new(s1, s2)
        .with_interval(interval)
        .with_window(window)
        .with_regression(regression)
        .with_stationarity(adf);
    let report = analyze_source(&store, config.snapshot_limit, &request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.response())?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Prompt for the symbols that were not given on the command line.
fn select_pair(
    store: &SqliteTickStore,
    limit: usize,
    first: Option<String>,
) -> Result<(String, String)> {
    let symbols = store.symbols(limit)?;
    if symbols.len() < 2 {
        bail!(
            "Need at least two symbols in the store, found {}",
            symbols.len()
        );
    }

    let s1 = match first {
        Some(s1) => s1,
        None => Select::new("First symbol:", symbols.clone())
            .prompt()
            .context("Symbol selection cancelled")?,
    };
    let rest: Vec<String> = symbols.into_iter().filter(|s| *s != s1).collect();
    let s2 = Select::new("Second symbol:", rest)
        .prompt()
        .context("Symbol selection cancelled")?;

    Ok((s1, s2))
}
