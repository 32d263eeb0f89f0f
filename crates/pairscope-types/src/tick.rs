//! Trade tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single trade event.
///
/// Ticks are immutable once produced by an ingestion source. Records with a
/// missing price or an invalid timestamp are rejected before they become a
/// `Tick`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol (e.g. "BTCUSDT").
    pub symbol: String,
    /// Trade time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Trade price.
    pub price: f64,
    /// Traded quantity.
    #[serde(alias = "qty")]
    pub quantity: f64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        price: f64,
        quantity: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            price,
            quantity,
        }
    }

    /// Returns the traded notional (price * quantity).
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }

    /// Returns true if price and quantity are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.price.is_finite() && self.quantity.is_finite()
    }
}
