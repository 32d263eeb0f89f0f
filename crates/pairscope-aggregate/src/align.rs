//! Two-symbol alignment on a common time grid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Bar;

/// One row of the merged two-symbol table.
///
/// Fields are `None` where a symbol had no bar at (or before) the row's
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    /// Bucket start shared by both symbols.
    pub timestamp: DateTime<Utc>,
    /// Close price of symbol A.
    pub price_a: Option<f64>,
    /// Volume of symbol A.
    pub volume_a: Option<f64>,
    /// Close price of symbol B.
    pub price_b: Option<f64>,
    /// Volume of symbol B.
    pub volume_b: Option<f64>,
}

impl AlignedRow {
    /// Creates a fully populated row.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        price_a: f64,
        volume_a: f64,
        price_b: f64,
        volume_b: f64,
    ) -> Self {
        Self {
            timestamp,
            price_a: Some(price_a),
            volume_a: Some(volume_a),
            price_b: Some(price_b),
            volume_b: Some(volume_b),
        }
    }

    const fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            price_a: None,
            volume_a: None,
            price_b: None,
            volume_b: None,
        }
    }

    /// Returns both prices when both are present.
    #[must_use]
    pub fn prices(&self) -> Option<(f64, f64)> {
        self.price_a.zip(self.price_b)
    }

    /// Returns true if both prices are present.
    #[must_use]
    pub const fn has_both_prices(&self) -> bool {
        self.price_a.is_some() && self.price_b.is_some()
    }

    /// Returns true if every value field is missing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.price_a.is_none()
            && self.volume_a.is_none()
            && self.price_b.is_none()
            && self.volume_b.is_none()
    }
}

/// Merges two bar series on the union of their period starts, without filling.
///
/// The result is ascending by timestamp with unique timestamps.
#[must_use]
pub fn merge(bars_a: &[Bar], bars_b: &[Bar]) -> Vec<AlignedRow> {
    let mut rows: BTreeMap<DateTime<Utc>, AlignedRow> = BTreeMap::new();

    for bar in bars_a {
        let row = rows
            .entry(bar.period_start)
            .or_insert_with(|| AlignedRow::empty(bar.period_start));
        row.price_a = Some(bar.close_price);
        row.volume_a = Some(bar.volume);
    }

    for bar in bars_b {
        let row = rows
            .entry(bar.period_start)
            .or_insert_with(|| AlignedRow::empty(bar.period_start));
        row.price_b = Some(bar.close_price);
        row.volume_b = Some(bar.volume);
    }

    rows.into_values().collect()
}

/// Forward-fills each column from the most recent earlier value.
///
/// Values that have no earlier observation stay missing. Applying this to
/// an already filled sequence leaves it unchanged.
#[must_use]
pub fn forward_fill(mut rows: Vec<AlignedRow>) -> Vec<AlignedRow> {
    let mut last = AlignedRow::empty(DateTime::<Utc>::UNIX_EPOCH);

    for row in &mut rows {
        row.price_a = row.price_a.or(last.price_a);
        row.volume_a = row.volume_a.or(last.volume_a);
        row.price_b = row.price_b.or(last.price_b);
        row.volume_b = row.volume_b.or(last.volume_b);
        last = *row;
    }

    rows
}

/// Aligns two symbols' bars into a gap-free table.
///
/// Merges on the union of period starts, forward-fills, drops rows where
/// every field is missing, then drops rows still missing either price. If
/// either series is empty the result is empty.
#[must_use]
pub fn align(bars_a: &[Bar], bars_b: &[Bar]) -> Vec<AlignedRow> {
    forward_fill(merge(bars_a, bars_b))
        .into_iter()
        .filter(|row| !row.is_empty())
        .filter(AlignedRow::has_both_prices)
        .collect()
}
