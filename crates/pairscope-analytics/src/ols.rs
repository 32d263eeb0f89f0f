//! Ordinary least squares on dense matrices.

use nalgebra::{DMatrix, DVector};

/// Result of an ordinary least squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// Estimated coefficients, one per design column.
    pub params: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    /// Number of observations.
    pub nobs: usize,
}

impl OlsFit {
    /// Number of estimated parameters.
    #[must_use]
    pub fn k(&self) -> usize {
        self.params.len()
    }

    /// t-statistic of coefficient `i`.
    #[must_use]
    pub fn t_value(&self, i: usize) -> Option<f64> {
        let param = self.params.get(i)?;
        let se = self.std_errors.get(i)?;
        let t = param / se;
        t.is_finite().then_some(t)
    }

    /// Gaussian log-likelihood of the fit.
    #[must_use]
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion.
    #[must_use]
    pub fn aic(&self) -> f64 {
        2.0f64.mul_add(self.k() as f64, -2.0 * self.log_likelihood())
    }
}

/// Fits `y = X b` by least squares through the normal equations.
///
/// Returns `None` when there are no more observations than columns, the
/// normal matrix is singular, or the result is not finite.
#[must_use]
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsFit> {
    let (nobs, k) = x.shape();
    if k == 0 || nobs <= k || y.len() != nobs {
        return None;
    }

    let xt = x.transpose();
    let xtx_inv = (&xt * x).try_inverse()?;
    let beta = &xtx_inv * (&xt * y);

    let residuals = y - x * &beta;
    let ssr = residuals.norm_squared();
    let scale = ssr / (nobs - k) as f64;

    let params: Vec<f64> = beta.iter().copied().collect();
    let std_errors: Vec<f64> = (0..k).map(|i| (scale * xtx_inv[(i, i)]).sqrt()).collect();

    if !params.iter().all(|p| p.is_finite()) || !ssr.is_finite() {
        return None;
    }

    Some(OlsFit {
        params,
        std_errors,
        ssr,
        nobs,
    })
}
