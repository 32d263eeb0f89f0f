//! Bucketing interval definitions.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Time unit of a bucketing interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    /// Seconds.
    Seconds,
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days.
    Days,
}

impl IntervalUnit {
    /// Returns the length of one unit in seconds.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 3_600,
            Self::Days => 86_400,
        }
    }

    /// Returns the canonical suffix used when rendering an interval.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Minutes => "min",
            Self::Hours => "h",
            Self::Days => "d",
        }
    }

    fn parse_token(token: &str) -> Option<Self> {
        match token {
            "s" | "S" | "sec" | "secs" | "second" | "seconds" => Some(Self::Seconds),
            "min" | "T" | "m" | "mins" | "minute" | "minutes" => Some(Self::Minutes),
            "h" | "H" | "hr" | "hour" | "hours" => Some(Self::Hours),
            "d" | "D" | "day" | "days" => Some(Self::Days),
            _ => None,
        }
    }
}

/// A fixed-width bucketing interval, such as `1min` or `15s`.
///
/// Buckets are aligned to the Unix epoch: a timestamp `t` belongs to the
/// bucket starting at `floor(t / width) * width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    magnitude: u32,
    unit: IntervalUnit,
}

impl Default for Interval {
    fn default() -> Self {
        Self::minutes(1)
    }
}

impl Interval {
    /// Widest accepted interval in seconds; its width in microseconds fits in `i64`.
    pub const MAX_SECONDS: i64 = i64::MAX / MICROS_PER_SECOND;

    /// Creates a new interval.
    ///
    /// # Errors
    ///
    /// Returns an error if `magnitude` is zero or the interval is wider
    /// than [`Self::MAX_SECONDS`].
    pub fn new(magnitude: u32, unit: IntervalUnit) -> Result<Self, IntervalParseError> {
        if magnitude == 0 {
            return Err(IntervalParseError::ZeroMagnitude);
        }
        let interval = Self { magnitude, unit };
        if interval.total_seconds() > Self::MAX_SECONDS {
            return Err(IntervalParseError::TooWide(interval.to_string()));
        }
        Ok(interval)
    }

    /// Creates an interval of `n` seconds (clamped to at least one).
    #[must_use]
    pub const fn seconds(n: u32) -> Self {
        Self::clamped(n, IntervalUnit::Seconds)
    }

    /// Creates an interval of `n` minutes (clamped to at least one).
    #[must_use]
    pub const fn minutes(n: u32) -> Self {
        Self::clamped(n, IntervalUnit::Minutes)
    }

    /// Creates an interval of `n` hours (clamped to at least one).
    #[must_use]
    pub const fn hours(n: u32) -> Self {
        Self::clamped(n, IntervalUnit::Hours)
    }

    /// Creates an interval of `n` days (clamped to at least one).
    #[must_use]
    pub const fn days(n: u32) -> Self {
        Self::clamped(n, IntervalUnit::Days)
    }

    const fn clamped(n: u32, unit: IntervalUnit) -> Self {
        Self {
            magnitude: if n == 0 { 1 } else { n },
            unit,
        }
    }

    /// Returns the integer magnitude.
    #[must_use]
    pub const fn magnitude(&self) -> u32 {
        self.magnitude
    }

    /// Returns the unit.
    #[must_use]
    pub const fn unit(&self) -> IntervalUnit {
        self.unit
    }

    /// Returns the interval width in seconds.
    #[must_use]
    pub const fn total_seconds(&self) -> i64 {
        self.magnitude as i64 * self.unit.seconds()
    }

    /// Returns the interval width as a [`TimeDelta`].
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(self.total_seconds())
    }

    /// Returns the start of the bucket containing `timestamp`.
    #[must_use]
    ///
    /// Intervals wider than [`Self::MAX_SECONDS`] are treated as that width.
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let width = self
            .total_seconds()
            .min(Self::MAX_SECONDS)
            .saturating_mul(MICROS_PER_SECOND);
        let micros = timestamp.timestamp_micros();
        let start = micros - micros.rem_euclid(width);
        DateTime::from_timestamp_micros(start).unwrap_or(timestamp)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    /// Parses `"<n><unit>"`, e.g. `1T`, `5min`, `30s`, `4h`, `1D`.
    ///
    /// Only the first whitespace-separated token is considered, and a
    /// missing magnitude means one (`"T"` is one minute).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.split_whitespace().next().ok_or(IntervalParseError::Empty)?;

        let split = token
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| IntervalParseError::MissingUnit(token.to_string()))?;
        let (digits, unit) = token.split_at(split);

        let magnitude = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u32>()
                .map_err(|_| IntervalParseError::InvalidMagnitude(digits.to_string()))?
        };

        let unit = IntervalUnit::parse_token(unit)
            .ok_or_else(|| IntervalParseError::UnknownUnit(unit.to_string()))?;

        Self::new(magnitude, unit)
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalParseError {
    /// The input contained no token.
    #[error("empty interval specification")]
    Empty,

    /// The token had no unit suffix.
    #[error("interval '{0}' has no unit, expected one of: s, min, h, d")]
    MissingUnit(String),

    /// The magnitude could not be parsed.
    #[error("invalid interval magnitude '{0}'")]
    InvalidMagnitude(String),

    /// The magnitude was zero.
    #[error("interval magnitude must be at least 1")]
    ZeroMagnitude,

    /// The unit suffix was not recognised.
    #[error("unknown interval unit '{0}', expected one of: s, min, h, d")]
    UnknownUnit(String),

    /// The interval is wider than [`Interval::MAX_SECONDS`].
    #[error("interval '{0}' is too wide")]
    TooWide(String),
}
