//! Trade payload parsing.

use chrono::DateTime;
use pairscope_types::Tick;
use serde_json::Value;

fn number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Converts a trade message into a tick.
///
/// Accepts a combined-stream envelope (`{"stream": .., "data": {..}}`) or a
/// bare trade payload. The payload must carry `s` (symbol), `p` (price) and
/// `T` (trade time in epoch milliseconds); a missing `q` is a zero quantity.
/// Anything else, including invalid JSON, yields `None`.
#[must_use]
pub fn parse_trade_message(text: &str) -> Option<Tick> {
    let value: Value = serde_json::from_str(text).ok()?;
    let payload = value.get("data").unwrap_or(&value);

    let symbol = payload.get("s")?.as_str()?;
    let price = number(payload.get("p")?)?;
    let quantity = payload.get("q").and_then(number).unwrap_or(0.0);
    let timestamp = DateTime::from_timestamp_millis(payload.get("T")?.as_i64()?)?;

    let tick = Tick::new(symbol, timestamp, price, quantity);
    (!symbol.is_empty() && tick.is_finite()).then_some(tick)
}
