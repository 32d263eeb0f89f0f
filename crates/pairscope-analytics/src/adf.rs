//! Augmented Dickey-Fuller unit-root test.
//!
//! The test regresses the first difference of a series on its lagged level,
//! a constant and a number of lagged differences chosen by AIC. The
//! t-statistic of the lagged level is mapped to a p-value with MacKinnon's
//! (1994) response-surface approximation.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::ols::{OlsFit, fit_ols};

/// Minimum number of observations before the test is attempted.
pub const MIN_ADF_OBSERVATIONS: usize = 10;

// MacKinnon (1994) coefficients for the constant-only case with one series.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038_269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.932_02, -0.127_45, -0.010_368];

/// Outcome of an augmented Dickey-Fuller test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    /// t-statistic of the lagged level coefficient.
    pub statistic: f64,
    /// Approximate p-value of the unit-root null.
    pub p_value: f64,
    /// Number of lagged differences selected.
    pub used_lag: usize,
    /// Observations in the final regression.
    pub nobs: usize,
}

/// Runs the test on the spread when `enabled`, returning its p-value.
///
/// Non-finite values are discarded first. Disabled, fewer than
/// [`MIN_ADF_OBSERVATIONS`] values, or a numerical failure all yield `None`.
#[must_use]
pub fn stationarity_p_value(spread: &[f64], enabled: bool) -> Option<f64> {
    if !enabled {
        return None;
    }

    let clean: Vec<f64> = spread.iter().copied().filter(|v| v.is_finite()).collect();
    let result = adf_test(&clean);

    debug!(
        observations = clean.len(),
        p_value = result.map(|r| r.p_value),
        "Ran stationarity test"
    );

    result.map(|r| r.p_value)
}

/// Runs an augmented Dickey-Fuller test with a constant and AIC lag selection.
///
/// Returns `None` if the series is shorter than [`MIN_ADF_OBSERVATIONS`] or
/// the regressions cannot be fitted (e.g. a constant series).
#[must_use]
pub fn adf_test(series: &[f64]) -> Option<AdfResult> {
    let n = series.len();
    if n < MIN_ADF_OBSERVATIONS {
        return None;
    }

    let max_lag = max_lag(n)?;
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    // Every candidate is fitted on the sample left after the largest lag.
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let Some(fit) = lagged_regression(series, &diffs, max_lag, lag) else {
            continue;
        };
        let aic = fit.aic();
        if best.is_none_or(|(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }
    let (_, used_lag) = best?;

    let fit = lagged_regression(series, &diffs, used_lag, used_lag)?;
    let statistic = fit.t_value(0)?;
    let p_value = mackinnon_p_value(statistic)?;

    Some(AdfResult {
        statistic,
        p_value,
        used_lag,
        nobs: fit.nobs,
    })
}

/// MacKinnon approximate p-value for a Dickey-Fuller statistic with a constant.
#[must_use]
pub fn mackinnon_p_value(tau: f64) -> Option<f64> {
    if tau.is_nan() {
        return None;
    }
    if tau > TAU_MAX {
        return Some(1.0);
    }
    if tau < TAU_MIN {
        return Some(0.0);
    }

    let coefficients: &[f64] = if tau <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    let z = coefficients.iter().rev().fold(0.0_f64, |acc, c| acc.mul_add(tau, *c));

    let normal = Normal::new(0.0, 1.0).ok()?;
    Some(normal.cdf(z))
}

/// Schwert's rule, capped so every candidate regression stays identified.
fn max_lag(n: usize) -> Option<usize> {
    let cap = (n / 2).checked_sub(2)?;
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    Some(schwert.min(cap))
}

/// Regresses `diffs[t]` on `series[t]`, `diffs[t-1..=t-lag]` and a constant
/// for `t` in `sample_lag..diffs.len()`.
fn lagged_regression(
    series: &[f64],
    diffs: &[f64],
    sample_lag: usize,
    lag: usize,
) -> Option<OlsFit> {
    let nobs = diffs.len().checked_sub(sample_lag)?;
    if nobs == 0 || lag > sample_lag {
        return None;
    }

    let k = lag + 2;
    let x = DMatrix::from_fn(nobs, k, |r, c| {
        let t = sample_lag + r;
        match c {
            0 => series[t],
            c if c <= lag => diffs[t - c],
            _ => 1.0,
        }
    });
    let y = DVector::from_iterator(nobs, diffs[sample_lag..].iter().copied());

    fit_ols(&x, &y)
}
