//! Tick access interfaces.

use pairscope_analytics::{AnalyticsReport, AnalyticsRequest, run_analytics};
use pairscope_types::{Result, Tick};
use std::collections::BTreeSet;

/// Read-only access to stored ticks.
pub trait TickSource: Send + Sync {
    /// Returns the most recent `limit` ticks in ascending timestamp order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn snapshot(&self, limit: usize) -> Result<Vec<Tick>>;

    /// Returns the distinct symbols in the current snapshot, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn symbols(&self, limit: usize) -> Result<Vec<String>> {
        let symbols: BTreeSet<String> = self
            .snapshot(limit)?
            .into_iter()
            .map(|tick| tick.symbol)
            .collect();
        Ok(symbols.into_iter().collect())
    }
}

/// Append-only access to stored ticks.
pub trait TickSink: Send + Sync {
    /// Appends ticks, returning how many were written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn append(&self, ticks: &[Tick]) -> Result<usize>;
}

/// A store that can be both read and appended to.
pub trait TickStore: TickSource + TickSink {}

impl<T: TickSource + TickSink + ?Sized> TickStore for T {}

/// Runs the analytics pipeline over a snapshot of `source`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or the pipeline rejects
/// the request.
pub fn analyze_source<S: TickSource + ?Sized>(
    source: &S,
    limit: usize,
    request: &AnalyticsRequest,
) -> Result<AnalyticsReport> {
    let ticks = source.snapshot(limit)?;
    run_analytics(&ticks, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTickStore;
    use chrono::{TimeDelta, TimeZone, Utc};
    use pairscope_types::PairscopeError;

    #[test]
    fn test_analyze_empty_source() {
        let store = MemoryTickStore::new();
        let err = analyze_source(&store, 100, &AnalyticsRequest::new("AAA", "BBB")).unwrap_err();
        assert!(matches!(err, PairscopeError::DataUnavailable));
    }

    #[test]
    fn test_analyze_through_trait_object() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryTickStore::new();
        let ticks: Vec<Tick> = (0..3)
            .flat_map(|i| {
                let ts = base + TimeDelta::minutes(i);
                [Tick::new("AAA", ts, 10.0, 1.0), Tick::new("BBB", ts, 5.0, 1.0)]
            })
            .collect();
        store.append(&ticks).unwrap();

        let source: &dyn TickSource = &store;
        let report = analyze_source(source, 100, &AnalyticsRequest::new("AAA", "BBB")).unwrap();
        assert_eq!(report.metrics.data_points, 3);
        assert_eq!(source.symbols(100).unwrap(), vec!["AAA", "BBB"]);
    }
}
