//! Feed configuration.

use std::time::Duration;

/// Binance combined-stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443/stream";

/// Symbols subscribed by default.
pub const DEFAULT_SYMBOLS: &[&str] = &["btcusdt", "ethusdt"];

/// Configuration of the trade feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Combined-stream endpoint without query string.
    pub base_url: String,
    /// Symbols to subscribe to.
    pub symbols: Vec<String>,
    /// Silence after which the connection is dropped.
    pub idle_timeout: Duration,
    /// Wait before reconnecting.
    pub reconnect_delay: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STREAM_URL.to_string(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| (*s).to_string()).collect(),
            idle_timeout: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

impl StreamConfig {
    /// Sets the endpoint.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the subscribed symbols.
    #[must_use]
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the idle timeout.
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets the reconnect delay.
    #[must_use]
    pub const fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Returns the subscription URL, e.g. `...?streams=btcusdt@trade/ethusdt@trade`.
    #[must_use]
    pub fn url(&self) -> String {
        let streams: Vec<String> = self
            .symbols
            .iter()
            .map(|s| format!("{}@trade", s.to_lowercase()))
            .collect();
        format!("{}?streams={}", self.base_url, streams.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        assert_eq!(
            StreamConfig::default().url(),
            "wss://stream.binance.com:9443/stream?streams=btcusdt@trade/ethusdt@trade"
        );
    }

    #[test]
    fn test_custom_symbols_lowercased() {
        let config = StreamConfig::default().with_symbols(["SOLUSDT"]);
        assert!(config.url().ends_with("?streams=solusdt@trade"));
    }
}
