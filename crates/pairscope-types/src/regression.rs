//! Hedge ratio regression variants.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordinary least squares variant used to estimate the hedge ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RegressionType {
    /// `price_a = alpha + beta * price_b`.
    #[default]
    #[serde(rename = "OLS_I", alias = "WITH_INTERCEPT")]
    WithIntercept,
    /// `price_a = beta * price_b` (regression through the origin).
    #[serde(rename = "OLS_NOI", alias = "NO_INTERCEPT")]
    NoIntercept,
}

impl RegressionType {
    /// Returns the wire identifier (`OLS_I` / `OLS_NOI`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WithIntercept => "OLS_I",
            Self::NoIntercept => "OLS_NOI",
        }
    }

    /// Returns true if the fitted model includes a constant term.
    #[must_use]
    pub const fn has_intercept(&self) -> bool {
        matches!(self, Self::WithIntercept)
    }

    /// Returns all variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::WithIntercept, Self::NoIntercept]
    }
}

impl std::fmt::Display for RegressionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RegressionType {
    type Err = RegressionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "OLS_I" | "WITH_INTERCEPT" | "INTERCEPT" => Ok(Self::WithIntercept),
            "OLS_NOI" | "NO_INTERCEPT" | "ORIGIN" => Ok(Self::NoIntercept),
            _ => Err(RegressionParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid regression type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegressionParseError(String);

impl std::fmt::Display for RegressionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid regression type '{}', expected one of: OLS_I, OLS_NOI",
            self.0
        )
    }
}

impl std::error::Error for RegressionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_parse() {
        assert_eq!(
            "OLS_I".parse::<RegressionType>().unwrap(),
            RegressionType::WithIntercept
        );
        assert_eq!(
            "no-intercept".parse::<RegressionType>().unwrap(),
            RegressionType::NoIntercept
        );
        assert!("ridge".parse::<RegressionType>().is_err());
    }

    #[test]
    fn test_regression_serde() {
        let json = serde_json::to_string(&RegressionType::NoIntercept).unwrap();
        assert_eq!(json, "\"OLS_NOI\"");
        let parsed: RegressionType = serde_json::from_str("\"WITH_INTERCEPT\"").unwrap();
        assert_eq!(parsed, RegressionType::WithIntercept);
    }
}
