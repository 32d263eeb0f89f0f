//! Pairs-trading analytics for pairscope.
//!
//! - [`annotate`] - Spread and rolling statistics over aligned rows
//! - [`estimate_hedge`] - Hedge ratio by ordinary least squares
//! - [`adf_test`] - Augmented Dickey-Fuller test with MacKinnon p-values
//! - [`run_analytics`] - The full tick-to-report pipeline

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pairscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adf;
mod hedge;
mod metrics;
mod ols;
mod pipeline;
mod rolling;

pub use adf::{AdfResult, MIN_ADF_OBSERVATIONS, adf_test, mackinnon_p_value, stationarity_p_value};
pub use hedge::{HedgeEstimate, MIN_HEDGE_POINTS, estimate_hedge};
pub use metrics::{Metric, Metrics};
pub use ols::{OlsFit, fit_ols};
pub use pipeline::{
    AnalyticsReport, AnalyticsRequest, AnalyticsResponse, ChartRecord, DEFAULT_WINDOW,
    run_analytics,
};
pub use rolling::{AnnotatedRow, annotate};
