//! Bulk CSV loading.

use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use pairscope_types::{PairscopeError, Result, Tick};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::{info, warn};

use crate::{TickSink, parse_timestamp};

const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "time", "ts", "date", "datetime", "open_time"];
const PRICE_ALIASES: &[&str] = &["price", "close", "last"];
const QTY_ALIASES: &[&str] = &["qty", "quantity", "volume", "vol", "size"];
const SYMBOL_ALIASES: &[&str] = &["symbol", "ticker", "pair", "instrument"];

/// Rejects file names that do not end in `.csv`.
///
/// # Errors
///
/// Returns [`PairscopeError::UploadValidation`] for any other extension.
pub fn check_file_name(name: &str) -> Result<()> {
    if name.to_ascii_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err(PairscopeError::upload("Only CSV files are accepted."))
    }
}

/// Positions of the tick fields within an upload's header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    /// Timestamp column.
    pub timestamp: usize,
    /// Symbol column.
    pub symbol: usize,
    /// Price column.
    pub price: usize,
    /// Quantity column.
    pub qty: usize,
}

impl ColumnMap {
    /// Resolves the tick fields from a header row.
    ///
    /// Headers are matched case-insensitively against each field's aliases;
    /// the first matching column wins.
    ///
    /// # Errors
    ///
    /// Returns [`PairscopeError::UploadValidation`] naming every field that
    /// could not be resolved.
    pub fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.contains(&h.trim().to_ascii_lowercase().as_str()))
        };

        let timestamp = find(TIMESTAMP_ALIASES);
        let symbol = find(SYMBOL_ALIASES);
        let price = find(PRICE_ALIASES);
        let qty = find(QTY_ALIASES);

        match (timestamp, symbol, price, qty) {
            (Some(timestamp), Some(symbol), Some(price), Some(qty)) => Ok(Self {
                timestamp,
                symbol,
                price,
                qty,
            }),
            _ => {
                let missing: Vec<&str> = [
                    ("timestamp", timestamp),
                    ("symbol", symbol),
                    ("price", price),
                    ("qty", qty),
                ]
                .iter()
                .filter(|(_, found)| found.is_none())
                .map(|(name, _)| *name)
                .collect();
                Err(PairscopeError::upload(format!(
                    "CSV must contain columns: timestamp, symbol, price, qty (missing: {})",
                    missing.join(", ")
                )))
            }
        }
    }

    fn tick(&self, record: &StringRecord) -> Option<Tick> {
        let symbol = record.get(self.symbol)?.trim();
        if symbol.is_empty() {
            return None;
        }
        let timestamp = parse_timestamp(record.get(self.timestamp)?)?;
        let price = record.get(self.price)?.trim().parse::<f64>().ok()?;
        let qty = record.get(self.qty)?.trim().parse::<f64>().ok()?;

        let tick = Tick::new(symbol, timestamp, price, qty);
        tick.is_finite().then_some(tick)
    }
}

/// Ticks parsed from an upload.
#[derive(Debug, Clone, Default)]
pub struct ParsedUpload {
    /// Rows that mapped to a valid tick.
    pub ticks: Vec<Tick>,
    /// Rows that were skipped.
    pub dropped: usize,
}

/// Outcome of a bulk load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    /// Ticks written to the store.
    pub accepted: usize,
    /// Rows skipped because a field could not be parsed.
    pub dropped: usize,
    /// Distinct symbols among the accepted ticks, sorted.
    pub symbols: Vec<String>,
}

impl UploadSummary {
    /// Human-readable confirmation message.
    #[must_use]
    pub fn message(&self) -> String {
        let symbols: Vec<String> = self.symbols.iter().map(|s| format!("'{s}'")).collect();
        format!(
            "Successfully ingested {} records for symbols: [{}]",
            self.accepted,
            symbols.join(", ")
        )
    }
}

/// Parses a CSV upload into ticks without writing anything.
///
/// # Errors
///
/// Returns [`PairscopeError::UploadValidation`] if the header cannot be read
/// or mapped, or if no row survives parsing.
pub async fn parse_csv<R>(reader: R) -> Result<ParsedUpload>
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv = AsyncReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .create_reader(reader);

    let headers = csv
        .headers()
        .await
        .map_err(|e| PairscopeError::upload(format!("could not read CSV header: {e}")))?
        .clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut parsed = ParsedUpload::default();
    let mut record = StringRecord::new();
    loop {
        match csv.read_record(&mut record).await {
            Ok(true) => match columns.tick(&record) {
                Some(tick) => parsed.ticks.push(tick),
                None => parsed.dropped += 1,
            },
            Ok(false) => break,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable CSV row");
                parsed.dropped += 1;
            }
        }
    }

    if parsed.ticks.is_empty() {
        return Err(PairscopeError::upload(
            "No valid rows found in CSV after parsing.",
        ));
    }

    Ok(parsed)
}

/// Validates, parses and appends a CSV upload to `sink`.
///
/// Nothing is written unless the file name, header and at least one row are
/// valid. The append runs on the blocking pool.
///
/// # Errors
///
/// Returns [`PairscopeError::UploadValidation`] for a rejected upload, or a
/// store error if the append fails.
pub async fn ingest_csv<S, R>(sink: Arc<S>, file_name: &str, reader: R) -> Result<UploadSummary>
where
    S: TickSink + ?Sized + 'static,
    R: AsyncRead + Unpin + Send,
{
    check_file_name(file_name)?;
    let ParsedUpload { ticks, dropped } = parse_csv(reader).await?;

    let symbols: BTreeSet<&str> = ticks.iter().map(|t| t.symbol.as_str()).collect();
    let symbols: Vec<String> = symbols.into_iter().map(str::to_string).collect();
    let accepted = tokio::task::spawn_blocking(move || sink.append(&ticks))
        .await
        .map_err(|e| PairscopeError::store(format!("append task failed: {e}")))??;

    info!(
        file = file_name,
        accepted,
        dropped,
        symbols = ?symbols,
        "Ingested CSV upload"
    );

    Ok(UploadSummary {
        accepted,
        dropped,
        symbols,
    })
}
