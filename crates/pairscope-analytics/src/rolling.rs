//! Spread and trailing-window statistics.

use chrono::{DateTime, Utc};
use pairscope_aggregate::AlignedRow;
use serde::{Deserialize, Serialize};

/// An aligned row extended with the spread and its rolling statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    /// Bucket start.
    pub timestamp: DateTime<Utc>,
    /// Close price of symbol A.
    pub price_a: f64,
    /// Volume of symbol A.
    pub volume_a: Option<f64>,
    /// Close price of symbol B.
    pub price_b: f64,
    /// Volume of symbol B.
    pub volume_b: Option<f64>,
    /// `price_a - price_b`.
    pub spread: f64,
    /// Trailing mean of the spread (at least one observation).
    pub rolling_mean: Option<f64>,
    /// Trailing sample standard deviation of the spread, `None` when zero.
    pub rolling_std: Option<f64>,
    /// `(spread - rolling_mean) / rolling_std`.
    pub zscore: Option<f64>,
    /// Trailing Pearson correlation of the two prices (at least two pairs).
    pub rolling_corr: Option<f64>,
}

/// Computes the spread and rolling statistics over a trailing window.
///
/// Rows missing either price are skipped. A `window` of zero is treated
/// as one.
#[must_use]
pub fn annotate(rows: &[AlignedRow], window: usize) -> Vec<AnnotatedRow> {
    let window = window.max(1);
    let paired: Vec<(&AlignedRow, f64, f64)> = rows
        .iter()
        .filter_map(|row| row.prices().map(|(a, b)| (row, a, b)))
        .collect();

    let spreads: Vec<f64> = paired.iter().map(|(_, a, b)| a - b).collect();
    let prices_a: Vec<f64> = paired.iter().map(|(_, a, _)| *a).collect();
    let prices_b: Vec<f64> = paired.iter().map(|(_, _, b)| *b).collect();

    paired
        .iter()
        .enumerate()
        .map(|(i, (row, price_a, price_b))| {
            let start = (i + 1).saturating_sub(window);
            let spread_window = &spreads[start..=i];

            let rolling_mean = mean(spread_window);
            let rolling_std = sample_std(spread_window);
            let zscore = rolling_mean
                .zip(rolling_std)
                .map(|(m, s)| (spreads[i] - m) / s)
                .filter(|z| z.is_finite());

            AnnotatedRow {
                timestamp: row.timestamp,
                price_a: *price_a,
                volume_a: row.volume_a,
                price_b: *price_b,
                volume_b: row.volume_b,
                spread: spreads[i],
                rolling_mean,
                rolling_std,
                zscore,
                rolling_corr: pearson(&prices_a[start..=i], &prices_b[start..=i]),
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation. Constant or single-value windows are `None`.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 || is_constant(values) {
        return None;
    }

    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    let std = (ss / (values.len() - 1) as f64).sqrt();

    (std.is_finite() && std > 0.0).then_some(std)
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() || is_constant(xs) || is_constant(ys) {
        return None;
    }

    let mx = mean(xs)?;
    let my = mean(ys)?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let corr = sxy / (sxx * syy).sqrt();
    corr.is_finite().then(|| corr.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
