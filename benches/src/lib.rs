//! Benchmark fixtures for pairscope.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pairscope_lib::Tick;

/// First leg of the synthetic pair.
pub const SYMBOL_A: &str = "AAAUSDT";

/// Second leg of the synthetic pair.
pub const SYMBOL_B: &str = "BBBUSDT";

/// Deterministic noise in [-0.5, 0.5).
#[derive(Debug, Clone)]
pub struct Noise(u64);

impl Noise {
    /// Creates a generator from a seed.
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the next sample.
    pub fn next_sample(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64 - 0.5
    }
}

/// Start of the synthetic tape.
pub fn tape_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds a cointegrated pair: `b` is a random walk and `a = 2b + OU noise`.
///
/// Each minute carries `ticks_per_minute` trades per symbol.
pub fn synthetic_pair(minutes: usize, ticks_per_minute: usize) -> Vec<Tick> {
    let mut noise = Noise::new(42);
    let mut level_b = 100.0;
    let mut residual = 0.0;
    let start = tape_start();
    let step_ms = 60_000 / ticks_per_minute.max(1) as i64;

    let mut ticks = Vec::with_capacity(minutes * ticks_per_minute * 2);
    for minute in 0..minutes {
        for i in 0..ticks_per_minute {
            level_b += noise.next_sample() * 0.2;
            residual = 0.8f64.mul_add(residual, noise.next_sample());
            let ts = start
                + TimeDelta::minutes(minute as i64)
                + TimeDelta::milliseconds(step_ms * i as i64);
            ticks.push(Tick::new(SYMBOL_A, ts, 2.0f64.mul_add(level_b, residual), 0.1));
            ticks.push(Tick::new(SYMBOL_B, ts, level_b, 0.2));
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_pair_shape() {
        let ticks = synthetic_pair(10, 3);
        assert_eq!(ticks.len(), 60);
        assert!(ticks.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(ticks.iter().all(Tick::is_finite));
    }
}
