//! Export command implementation.

use super::open_store;
use crate::display::{Format, write_report};
use anyhow::{Result, bail};
use pairscope_lib::export_file_name;
use pairscope_lib::prelude::*;
use std::path::PathBuf;

/// Export the annotated table for a pair. The stationarity test always runs.
#[allow(clippy::too_many_arguments)]
pub(crate) fn export(
    config: &StoreConfig,
    s1: &str,
    s2: &str,
    interval: Interval,
    window: usize,
    regression: RegressionType,
    format: Format,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let store = open_store(config)?;

    let request = AnalyticsRequest::new(s1, s2)
        .with_interval(interval)
        .with_window(window)
        .with_regression(regression)
        .with_stationarity(true);
    let report = analyze_source(&store, config.snapshot_limit, &request)?;

    if report.is_empty() {
        bail!("No data to export for {s1}/{s2} at {interval}");
    }

    let output = output.unwrap_or_else(|| {
        PathBuf::from(export_file_name(
            s1,
            s2,
            &interval.to_string(),
            format.extension(),
        ))
    });
    write_report(&report, &output, format)?;

    if !quiet {
        println!(
            "Exported {} rows (ADF p-value {}) to: {}",
            report.rows.len(),
            report.metrics.adf_p_value,
            output.display()
        );
    }
    Ok(())
}
