//! Summary metrics of an analytics run.

use serde::{Serialize, Serializer};

/// A numeric metric that is either a finite value or explicitly undefined.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    /// A finite value.
    Defined(f64),
    /// Not enough data, or the computation failed.
    #[default]
    Undefined,
}

impl Metric {
    /// Marker rendered for undefined metrics.
    pub const NOT_AVAILABLE: &'static str = "N/A";

    /// Creates a metric, treating `None` and non-finite values as undefined.
    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Defined(v),
            _ => Self::Undefined,
        }
    }

    /// Returns the value if defined.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    /// Returns true if the metric has a value.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    /// Renders the value with four decimals, or `N/A`.
    #[must_use]
    pub fn formatted(&self) -> String {
        self.to_string()
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        Self::from_option(value)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defined(v) => write!(f, "{v:.4}"),
            Self::Undefined => f.write_str(Self::NOT_AVAILABLE),
        }
    }
}

/// Serializes as a raw number, or `null` when undefined.
impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

fn serialize_formatted<S: Serializer>(metric: &Metric, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(metric)
}

/// Summary metrics of one analytics run.
///
/// `latest_spread`, `hedge_ratio` and `adf_p_value` serialize as display
/// strings (`"%.4f"` or `"N/A"`), while `z_latest` serializes as a number or
/// `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Metrics {
    /// Spread of the last row.
    #[serde(serialize_with = "serialize_formatted")]
    pub latest_spread: Metric,
    /// Slope of `price_a` on `price_b`.
    #[serde(serialize_with = "serialize_formatted")]
    pub hedge_ratio: Metric,
    /// Paired observations available to the hedge regression.
    pub hedge_points: usize,
    /// Augmented Dickey-Fuller p-value of the spread.
    #[serde(serialize_with = "serialize_formatted")]
    pub adf_p_value: Metric,
    /// Last defined z-score.
    pub z_latest: Metric,
    /// Number of aligned rows.
    pub data_points: usize,
}

impl Metrics {
    /// Metrics for a run with too few rows: everything undefined except counts.
    ///
    /// `hedge_points` still reports the aligned row count, since every
    /// aligned row has both prices defined whether or not a fit ran.
    #[must_use]
    pub const fn degenerate(data_points: usize) -> Self {
        Self {
            latest_spread: Metric::Undefined,
            hedge_ratio: Metric::Undefined,
            hedge_points: data_points,
            adf_p_value: Metric::Undefined,
            z_latest: Metric::Undefined,
            data_points,
        }
    }
}
