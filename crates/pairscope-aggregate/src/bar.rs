//! Bar data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated trades for one symbol over one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Instrument symbol.
    pub symbol: String,
    /// Bar open time (start of the period).
    pub period_start: DateTime<Utc>,
    /// Price of the last trade in the period.
    pub close_price: f64,
    /// Sum of traded quantities.
    pub volume: f64,
    /// Number of trades in the bar.
    pub tick_count: u32,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        period_start: DateTime<Utc>,
        close_price: f64,
        volume: f64,
        tick_count: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            period_start,
            close_price,
            volume,
            tick_count,
        }
    }

    /// Returns the traded notional valued at the close.
    #[must_use]
    pub fn close_notional(&self) -> f64 {
        self.close_price * self.volume
    }
}
