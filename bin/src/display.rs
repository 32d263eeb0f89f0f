//! Display utilities and output formatting for the pairscope CLI.

use anyhow::Result;
use clap::ValueEnum;
use pairscope_lib::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Rows shown at the bottom of `analyze` output.
const TAIL_ROWS: usize = 5;

/// Output format for exports.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Write a report to a file in the specified format.
pub(crate) fn write_report(report: &AnalyticsReport, output: &Path, format: Format) -> Result<()> {
    let file = File::create(output)?;
    let writer = BufWriter::new(file);

    match format {
        Format::Csv => CsvFormatter::new().write_report(report, writer)?,
        Format::Json => JsonFormatter::new().write_report(report, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_report(report, writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_report(report, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| Metric::NOT_AVAILABLE.to_string(), |v| format!("{v:.4}"))
}

/// Print the metrics table and the most recent rows of a report.
pub(crate) fn print_report(report: &AnalyticsReport) {
    let metrics = &report.metrics;

    println!(
        "Pair: {} / {} ({})",
        report.symbol_a, report.symbol_b, report.interval
    );
    println!();
    println!("{:<16} {:>14}", "METRIC", "VALUE");
    println!("{}", "-".repeat(31));
    println!("{:<16} {:>14}", "Latest spread", metrics.latest_spread.to_string());
    println!("{:<16} {:>14}", "Hedge ratio", metrics.hedge_ratio.to_string());
    println!("{:<16} {:>14}", "Hedge points", metrics.hedge_points);
    println!("{:<16} {:>14}", "ADF p-value", metrics.adf_p_value.to_string());
    println!("{:<16} {:>14}", "Latest z-score", metrics.z_latest.to_string());
    println!("{:<16} {:>14}", "Data points", metrics.data_points);

    if report.rows.is_empty() {
        println!("\nNot enough aligned data to compute rolling statistics.");
        return;
    }

    println!(
        "\n{:<20} {:>12} {:>12} {:>12} {:>10} {:>10}",
        "TIMESTAMP", report.symbol_a, report.symbol_b, "SPREAD", "ZSCORE", "CORR"
    );
    println!("{}", "-".repeat(81));

    let start = report.rows.len().saturating_sub(TAIL_ROWS);
    for row in &report.rows[start..] {
        println!(
            "{:<20} {:>12.4} {:>12.4} {:>12.4} {:>10} {:>10}",
            row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.price_a,
            row.price_b,
            row.spread,
            cell(row.zscore),
            cell(row.rolling_corr),
        );
    }
}
