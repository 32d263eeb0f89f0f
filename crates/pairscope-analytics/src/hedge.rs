//! Hedge ratio estimation.

use nalgebra::{DMatrix, DVector};
use pairscope_types::RegressionType;
use serde::Serialize;
use tracing::debug;

use crate::AnnotatedRow;
use crate::ols::fit_ols;

/// Minimum number of paired prices required for a hedge ratio.
pub const MIN_HEDGE_POINTS: usize = 5;

/// Hedge ratio of symbol A on symbol B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HedgeEstimate {
    /// Slope of `price_a` on `price_b`, if it could be estimated.
    pub hedge_ratio: Option<f64>,
    /// Number of paired observations the estimate used.
    pub hedge_points: usize,
}

/// Regresses `price_a` on `price_b` and returns the slope.
///
/// Fewer than [`MIN_HEDGE_POINTS`] pairs, a flat `price_b` or a singular
/// design leave the ratio undefined.
#[must_use]
pub fn estimate_hedge(rows: &[AnnotatedRow], regression: RegressionType) -> HedgeEstimate {
    let hedge_points = rows.len();
    let hedge_ratio = if hedge_points < MIN_HEDGE_POINTS {
        None
    } else {
        fit_slope(rows, regression)
    };

    debug!(
        points = hedge_points,
        regression = %regression,
        defined = hedge_ratio.is_some(),
        "Estimated hedge ratio"
    );

    HedgeEstimate {
        hedge_ratio,
        hedge_points,
    }
}

fn fit_slope(rows: &[AnnotatedRow], regression: RegressionType) -> Option<f64> {
    let n = rows.len();
    let y = DVector::from_iterator(n, rows.iter().map(|r| r.price_a));

    let (x, slope_col) = if regression.has_intercept() {
        let first = rows.first()?.price_b;
        if rows.iter().all(|r| r.price_b == first) {
            return None;
        }
        let x = DMatrix::from_fn(n, 2, |i, c| if c == 0 { 1.0 } else { rows[i].price_b });
        (x, 1)
    } else {
        let x = DMatrix::from_fn(n, 1, |i, _| rows[i].price_b);
        (x, 0)
    };

    let fit = fit_ols(&x, &y)?;
    fit.params.get(slope_col).copied().filter(|b| b.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeDelta, TimeZone, Utc};
    use pairscope_aggregate::AlignedRow;

    use crate::annotate;

    fn annotated(a: &[f64], b: &[f64], window: usize) -> Vec<AnnotatedRow> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let rows: Vec<AlignedRow> = a
            .iter()
            .zip(b)
            .enumerate()
            .map(|(i, (pa, pb))| {
                AlignedRow::new(base + TimeDelta::minutes(i as i64), *pa, 1.0, *pb, 1.0)
            })
            .collect();
        annotate(&rows, window)
    }

    #[test]
    fn test_four_points_undefined() {
        let rows = annotated(&[1.0, 2.0, 3.0, 4.0], &[2.0, 3.0, 5.0, 4.0], 2);
        let estimate = estimate_hedge(&rows, RegressionType::WithIntercept);
        assert_eq!(estimate.hedge_points, 4);
        assert!(estimate.hedge_ratio.is_none());
    }

    #[test]
    fn test_with_intercept_recovers_slope() {
        let b = [10.0, 11.0, 12.5, 13.0, 15.0, 14.0];
        let a: Vec<f64> = b.iter().map(|v| 5.0 + 1.5 * v).collect();
        let rows = annotated(&a, &b, 3);

        let estimate = estimate_hedge(&rows, RegressionType::WithIntercept);
        assert_eq!(estimate.hedge_points, 6);
        assert_relative_eq!(estimate.hedge_ratio.unwrap(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_intercept_variants_differ() {
        let b = [10.0, 11.0, 12.5, 13.0, 15.0, 14.0];
        let a: Vec<f64> = b.iter().map(|v| 5.0 + 1.5 * v).collect();
        let rows = annotated(&a, &b, 3);

        let with = estimate_hedge(&rows, RegressionType::WithIntercept)
            .hedge_ratio
            .unwrap();
        let without = estimate_hedge(&rows, RegressionType::NoIntercept)
            .hedge_ratio
            .unwrap();

        // through the origin the slope absorbs the intercept
        assert!(without > with);
        let expected = a.iter().zip(&b).map(|(x, y)| x * y).sum::<f64>()
            / b.iter().map(|y| y * y).sum::<f64>();
        assert_relative_eq!(without, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_intercept_variants_agree() {
        let b = [1.0, 2.0, 3.0, 4.0, 5.0];
        let a: Vec<f64> = b.iter().map(|v| 2.0 * v).collect();
        let rows = annotated(&a, &b, 2);

        let with = estimate_hedge(&rows, RegressionType::WithIntercept);
        let without = estimate_hedge(&rows, RegressionType::NoIntercept);
        assert_relative_eq!(with.hedge_ratio.unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(without.hedge_ratio.unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_leg_undefined() {
        let rows = annotated(&[1.0, 2.0, 3.0, 4.0, 5.0], &[7.0; 5], 2);
        let estimate = estimate_hedge(&rows, RegressionType::WithIntercept);
        assert_eq!(estimate.hedge_points, 5);
        assert!(estimate.hedge_ratio.is_none());
    }

    #[test]
    fn test_points_independent_of_window_and_variant() {
        let a = [3.0, 4.0, 6.0, 5.0, 7.0, 9.0, 8.0];
        let b = [1.0, 2.0, 2.5, 2.0, 3.0, 4.0, 3.5];
        for window in [1, 3, 20] {
            for regression in RegressionType::all() {
                let rows = annotated(&a, &b, window);
                assert_eq!(estimate_hedge(&rows, *regression).hedge_points, 7);
            }
        }
    }
}
