//! The tick-to-report analytics pipeline.

use pairscope_aggregate::{align, bucket_by_symbol};
use pairscope_types::{Interval, PairscopeError, RegressionType, Result, Tick};
use serde::Serialize;
use serde::ser::SerializeMap;
use tracing::{debug, info};

use crate::{AnnotatedRow, Metric, Metrics, annotate, estimate_hedge, stationarity_p_value};

/// Default rolling window length.
pub const DEFAULT_WINDOW: usize = 20;

/// Parameters of one analytics run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsRequest {
    /// First symbol (the dependent leg of the hedge regression).
    pub symbol_a: String,
    /// Second symbol.
    pub symbol_b: String,
    /// Bucketing interval.
    pub interval: Interval,
    /// Rolling window length, at least one.
    pub window: usize,
    /// Hedge regression variant.
    pub regression: RegressionType,
    /// Whether to run the stationarity test.
    pub run_stationarity: bool,
}

impl AnalyticsRequest {
    /// Creates a request for a pair with default settings.
    #[must_use]
    pub fn new(symbol_a: impl Into<String>, symbol_b: impl Into<String>) -> Self {
        Self {
            symbol_a: symbol_a.into(),
            symbol_b: symbol_b.into(),
            interval: Interval::default(),
            window: DEFAULT_WINDOW,
            regression: RegressionType::default(),
            run_stationarity: false,
        }
    }

    /// Sets the bucketing interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the rolling window length.
    #[must_use]
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the hedge regression variant.
    #[must_use]
    pub const fn with_regression(mut self, regression: RegressionType) -> Self {
        self.regression = regression;
        self
    }

    /// Enables or disables the stationarity test.
    #[must_use]
    pub const fn with_stationarity(mut self, enabled: bool) -> Self {
        self.run_stationarity = enabled;
        self
    }

    /// Checks the request parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PairscopeError::InvalidParameter`] for an empty symbol or a
    /// zero window.
    pub fn validate(&self) -> Result<()> {
        if self.symbol_a.trim().is_empty() || self.symbol_b.trim().is_empty() {
            return Err(PairscopeError::InvalidParameter(
                "both symbols are required".to_string(),
            ));
        }
        if self.window == 0 {
            return Err(PairscopeError::InvalidParameter(
                "window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Annotated rows and summary metrics for a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    /// First symbol.
    pub symbol_a: String,
    /// Second symbol.
    pub symbol_b: String,
    /// Interval the ticks were bucketed to.
    pub interval: Interval,
    /// One row per aligned timestamp; empty for a degenerate run.
    pub rows: Vec<AnnotatedRow>,
    /// Summary metrics.
    pub metrics: Metrics,
}

impl AnalyticsReport {
    /// Returns true if there are no annotated rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows as flat records keyed by symbol.
    #[must_use]
    pub fn chart_records(&self) -> Vec<ChartRecord<'_>> {
        self.rows
            .iter()
            .map(|row| ChartRecord {
                symbol_a: &self.symbol_a,
                symbol_b: &self.symbol_b,
                row,
            })
            .collect()
    }

    /// Returns the `{chart_data, metrics}` response body.
    #[must_use]
    pub fn response(&self) -> AnalyticsResponse<'_> {
        AnalyticsResponse {
            chart_data: self.chart_records(),
            metrics: &self.metrics,
        }
    }

    /// Returns the spread column.
    #[must_use]
    pub fn spreads(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.spread).collect()
    }
}

/// Serializable `{chart_data, metrics}` view of a report.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse<'a> {
    /// One flat record per row.
    pub chart_data: Vec<ChartRecord<'a>>,
    /// Summary metrics.
    pub metrics: &'a Metrics,
}

/// One annotated row rendered with symbol-named price and volume columns.
///
/// Keys: `timestamp`, `{a}`, `{a}_volume`, `{b}`, `{b}_volume`, `spread`,
/// `mean`, `std`, `zscore`, `rolling_corr`. Undefined values are `null`.
#[derive(Debug, Clone, Copy)]
pub struct ChartRecord<'a> {
    symbol_a: &'a str,
    symbol_b: &'a str,
    row: &'a AnnotatedRow,
}

impl<'a> ChartRecord<'a> {
    /// Column names in output order.
    #[must_use]
    pub fn columns(symbol_a: &str, symbol_b: &str) -> Vec<String> {
        vec![
            "timestamp".to_string(),
            symbol_a.to_string(),
            format!("{symbol_a}_volume"),
            symbol_b.to_string(),
            format!("{symbol_b}_volume"),
            "spread".to_string(),
            "mean".to_string(),
            "std".to_string(),
            "zscore".to_string(),
            "rolling_corr".to_string(),
        ]
    }

    /// The underlying row.
    #[must_use]
    pub const fn row(&self) -> &'a AnnotatedRow {
        self.row
    }
}

impl Serialize for ChartRecord<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let row = self.row;
        let mut map = serializer.serialize_map(Some(10))?;
        map.serialize_entry("timestamp", &row.timestamp)?;
        map.serialize_entry(self.symbol_a, &row.price_a)?;
        map.serialize_entry(&format!("{}_volume", self.symbol_a), &row.volume_a)?;
        map.serialize_entry(self.symbol_b, &row.price_b)?;
        map.serialize_entry(&format!("{}_volume", self.symbol_b), &row.volume_b)?;
        map.serialize_entry("spread", &row.spread)?;
        map.serialize_entry("mean", &row.rolling_mean)?;
        map.serialize_entry("std", &row.rolling_std)?;
        map.serialize_entry("zscore", &row.zscore)?;
        map.serialize_entry("rolling_corr", &row.rolling_corr)?;
        map.end()
    }
}

/// Runs the full pipeline over a tick snapshot.
///
/// Buckets every symbol, aligns the requested pair, annotates the spread,
/// estimates the hedge ratio and optionally tests the spread for
/// stationarity. Fewer than two aligned rows produce an empty report whose
/// metrics are undefined apart from the counts.
///
/// # Errors
///
/// - [`PairscopeError::InvalidParameter`] if the request is invalid
/// - [`PairscopeError::DataUnavailable`] if `ticks` is empty
/// - [`PairscopeError::SymbolNotPresent`] if either symbol has no bars
pub fn run_analytics(ticks: &[Tick], request: &AnalyticsRequest) -> Result<AnalyticsReport> {
    request.validate()?;

    if ticks.is_empty() {
        return Err(PairscopeError::DataUnavailable);
    }

    let bars = bucket_by_symbol(ticks, request.interval);
    let bars_for = |symbol: &str| {
        bars.get(symbol)
            .filter(|series| !series.is_empty())
            .ok_or_else(|| PairscopeError::symbol_not_present(symbol))
    };
    let bars_a = bars_for(&request.symbol_a)?;
    let bars_b = bars_for(&request.symbol_b)?;

    let aligned = align(bars_a, bars_b);
    debug!(
        symbol_a = %request.symbol_a,
        symbol_b = %request.symbol_b,
        bars_a = bars_a.len(),
        bars_b = bars_b.len(),
        rows = aligned.len(),
        "Aligned pair"
    );

    if aligned.len() < 2 {
        info!(rows = aligned.len(), "Not enough aligned rows for analytics");
        return Ok(AnalyticsReport {
            symbol_a: request.symbol_a.clone(),
            symbol_b: request.symbol_b.clone(),
            interval: request.interval,
            rows: Vec::new(),
            metrics: Metrics::degenerate(aligned.len()),
        });
    }

    let rows = annotate(&aligned, request.window);
    let hedge = estimate_hedge(&rows, request.regression);
    let spreads: Vec<f64> = rows.iter().map(|r| r.spread).collect();
    let adf_p_value = stationarity_p_value(&spreads, request.run_stationarity);

    let metrics = Metrics {
        latest_spread: Metric::from_option(spreads.last().copied()),
        hedge_ratio: Metric::from_option(hedge.hedge_ratio),
        hedge_points: hedge.hedge_points,
        adf_p_value: Metric::from_option(adf_p_value),
        z_latest: Metric::from_option(rows.iter().rev().find_map(|r| r.zscore)),
        data_points: rows.len(),
    };

    info!(
        symbol_a = %request.symbol_a,
        symbol_b = %request.symbol_b,
        interval = %request.interval,
        window = request.window,
        rows = rows.len(),
        hedge_ratio = %metrics.hedge_ratio,
        adf_p_value = %metrics.adf_p_value,
        "Computed pair analytics"
    );

    Ok(AnalyticsReport {
        symbol_a: request.symbol_a.clone(),
        symbol_b: request.symbol_b.clone(),
        interval: request.interval,
        rows,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use pairscope_types::ErrorKind;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// One tick per minute per symbol, a few seconds into the minute.
    fn pair_ticks(a: &[f64], b: &[f64]) -> Vec<Tick> {
        let mut ticks = Vec::new();
        for (i, price) in a.iter().enumerate() {
            let ts = base() + TimeDelta::minutes(i as i64) + TimeDelta::seconds(5);
            ticks.push(Tick::new("AAA", ts, *price, 1.0));
        }
        for (i, price) in b.iter().enumerate() {
            let ts = base() + TimeDelta::minutes(i as i64) + TimeDelta::seconds(7);
            ticks.push(Tick::new("BBB", ts, *price, 2.0));
        }
        ticks
    }

    fn noise(seed: u64, n: usize) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
            })
            .collect()
    }

    #[test]
    fn test_three_minute_pair() {
        let ticks = pair_ticks(&[100.0, 101.0, 100.0], &[50.0, 50.0, 51.0]);
        let request = AnalyticsRequest::new("AAA", "BBB").with_window(2);
        let report = run_analytics(&ticks, &request).unwrap();

        assert_eq!(report.spreads(), vec![50.0, 51.0, 49.0]);
        let means: Vec<f64> = report.rows.iter().filter_map(|r| r.rolling_mean).collect();
        assert_eq!(means, vec![50.0, 50.5, 50.0]);
        assert!(report.rows[2].zscore.unwrap() < 0.0);

        let metrics = report.metrics;
        assert_eq!(metrics.latest_spread, Metric::Defined(49.0));
        assert_eq!(metrics.data_points, 3);
        assert_eq!(metrics.hedge_points, 3);
        assert_eq!(metrics.hedge_ratio, Metric::Undefined);
        assert_eq!(metrics.adf_p_value, Metric::Undefined);
        assert_relative_eq!(
            metrics.z_latest.value().unwrap(),
            -1.0 / 2.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_single_row_is_degenerate() {
        let ticks = pair_ticks(&[100.0], &[50.0]);
        let report = run_analytics(&ticks, &AnalyticsRequest::new("AAA", "BBB")).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.metrics, Metrics::degenerate(1));
        assert_eq!(report.metrics.data_points, 1);
        assert_eq!(report.metrics.hedge_points, 1);
        assert!(!report.metrics.latest_spread.is_defined());
        assert!(!report.metrics.z_latest.is_defined());
    }

    #[test]
    fn test_disjoint_symbols_degenerate() {
        // AAA only trades after BBB stops, so forward fill pairs just one row
        let mut ticks = vec![Tick::new("BBB", base(), 10.0, 1.0)];
        ticks.push(Tick::new("AAA", base() + TimeDelta::minutes(5), 20.0, 1.0));
        let report = run_analytics(&ticks, &AnalyticsRequest::new("AAA", "BBB")).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.metrics.data_points, 1);
    }

    #[test]
    fn test_no_ticks() {
        let err = run_analytics(&[], &AnalyticsRequest::new("AAA", "BBB")).unwrap_err();
        assert!(matches!(err, PairscopeError::DataUnavailable));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_symbol() {
        let ticks = pair_ticks(&[1.0, 2.0], &[1.0, 2.0]);
        let err = run_analytics(&ticks, &AnalyticsRequest::new("AAA", "ZZZ")).unwrap_err();
        assert!(matches!(err, PairscopeError::SymbolNotPresent { ref symbol } if symbol == "ZZZ"));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_zero_window_rejected() {
        let ticks = pair_ticks(&[1.0, 2.0], &[1.0, 2.0]);
        let request = AnalyticsRequest::new("AAA", "BBB").with_window(0);
        let err = run_analytics(&ticks, &request).unwrap_err();
        assert!(matches!(err, PairscopeError::InvalidParameter(_)));
    }

    #[test]
    fn test_four_pairs_no_hedge_ratio() {
        let ticks = pair_ticks(&[10.0, 11.0, 13.0, 12.0], &[5.0, 6.0, 6.5, 6.0]);
        let report = run_analytics(&ticks, &AnalyticsRequest::new("AAA", "BBB")).unwrap();
        assert_eq!(report.metrics.hedge_points, 4);
        assert_eq!(report.metrics.hedge_ratio, Metric::Undefined);
    }

    #[test]
    fn test_hedge_ratio_variants() {
        let b = [10.0, 11.0, 12.5, 13.0, 15.0, 14.0];
        let a: Vec<f64> = b.iter().map(|v| 5.0 + 1.5 * v).collect();
        let ticks = pair_ticks(&a, &b);

        let with = run_analytics(&ticks, &AnalyticsRequest::new("AAA", "BBB")).unwrap();
        let without = run_analytics(
            &ticks,
            &AnalyticsRequest::new("AAA", "BBB").with_regression(RegressionType::NoIntercept),
        )
        .unwrap();

        assert_relative_eq!(with.metrics.hedge_ratio.value().unwrap(), 1.5, epsilon = 1e-9);
        assert_ne!(with.metrics.hedge_ratio, without.metrics.hedge_ratio);
        assert_eq!(with.metrics.hedge_points, without.metrics.hedge_points);
    }

    #[test]
    fn test_stationarity_floor() {
        let spread = noise(3, 9);
        let a: Vec<f64> = spread.iter().map(|s| 100.0 + s).collect();
        let ticks = pair_ticks(&a, &[100.0; 9]);
        let request = AnalyticsRequest::new("AAA", "BBB").with_stationarity(true);

        let report = run_analytics(&ticks, &request).unwrap();
        assert_eq!(report.metrics.data_points, 9);
        assert_eq!(report.metrics.adf_p_value, Metric::Undefined);
    }

    #[test]
    fn test_stationarity_mean_reverting_and_random_walk() {
        let mut x = 0.0;
        let reverting: Vec<f64> = noise(7, 200)
            .into_iter()
            .map(|e| {
                x = 0.3f64.mul_add(x, e);
                100.0 + x
            })
            .collect();
        let mut w = 100.0;
        let walk: Vec<f64> = noise(11, 200)
            .into_iter()
            .map(|e| {
                w += e;
                100.0 + w
            })
            .collect();
        let flat = vec![100.0; 200];
        let request = AnalyticsRequest::new("AAA", "BBB").with_stationarity(true);

        let report = run_analytics(&pair_ticks(&reverting, &flat), &request).unwrap();
        assert!(report.metrics.adf_p_value.value().unwrap() < 0.05);

        let report = run_analytics(&pair_ticks(&walk, &flat), &request).unwrap();
        assert!(report.metrics.adf_p_value.value().unwrap() > 0.05);

        let disabled = request.clone().with_stationarity(false);
        let report = run_analytics(&pair_ticks(&walk, &flat), &disabled).unwrap();
        assert_eq!(report.metrics.adf_p_value, Metric::Undefined);
    }

    #[test]
    fn test_five_minute_interval() {
        let a: Vec<f64> = (0..10).map(|i| 100.0 + f64::from(i)).collect();
        let b: Vec<f64> = (0..10).map(|i| 50.0 + f64::from(i) / 2.0).collect();
        let request = AnalyticsRequest::new("AAA", "BBB").with_interval(Interval::minutes(5));
        let report = run_analytics(&pair_ticks(&a, &b), &request).unwrap();

        assert_eq!(report.rows.len(), 2);
        // last tick in each bucket wins the close
        assert_relative_eq!(report.rows[0].price_a, 104.0);
        assert_relative_eq!(report.rows[1].price_b, 54.5);
        assert_relative_eq!(report.rows[0].volume_a.unwrap(), 5.0);
        assert_relative_eq!(report.rows[0].volume_b.unwrap(), 10.0);
    }

    #[test]
    fn test_response_shape() {
        let ticks = pair_ticks(&[100.0, 101.0, 100.0], &[50.0, 50.0, 51.0]);
        let request = AnalyticsRequest::new("AAA", "BBB").with_window(2);
        let report = run_analytics(&ticks, &request).unwrap();

        let value = serde_json::to_value(report.response()).unwrap();
        let first = &value["chart_data"][0];
        assert_eq!(first["AAA"], 100.0);
        assert_eq!(first["BBB_volume"], 2.0);
        assert_eq!(first["spread"], 50.0);
        assert!(first["std"].is_null());
        assert!(first["zscore"].is_null());
        assert_eq!(value["metrics"]["latest_spread"], "49.0000");
        assert_eq!(value["chart_data"].as_array().unwrap().len(), 3);
        assert_eq!(ChartRecord::columns("AAA", "BBB").len(), 10);
    }
}
