//! Streaming tick-to-bar bucketing.

use chrono::{DateTime, Utc};
use pairscope_types::{Interval, Tick};
use std::collections::BTreeMap;
use tracing::debug;

use crate::Bar;

/// Bars keyed by symbol, each series ascending by `period_start`.
pub type BarsBySymbol = BTreeMap<String, Vec<Bar>>;

/// Streaming tick bucketer for a single symbol.
///
/// Ticks must arrive in timestamp order. Intervals that receive no tick
/// produce no bar.
#[derive(Debug)]
pub struct TickBucketer {
    interval: Interval,
    current_bar: Option<BarBuilder>,
}

impl TickBucketer {
    /// Creates a new bucketer for the given interval.
    #[must_use]
    pub const fn new(interval: Interval) -> Self {
        Self {
            interval,
            current_bar: None,
        }
    }

    /// Returns the interval being bucketed to.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Processes a tick, potentially emitting a completed bar.
    ///
    /// Returns `Some(bar)` when a bar is completed by this tick,
    /// `None` otherwise.
    pub fn process(&mut self, tick: &Tick) -> Option<Bar> {
        let bar_start = self.interval.bucket_start(tick.timestamp);

        match self.current_bar.take() {
            Some(mut builder) if builder.period_start == bar_start => {
                builder.update(tick);
                self.current_bar = Some(builder);
                None
            }
            Some(builder) => {
                let completed = builder.finish();
                self.current_bar = Some(BarBuilder::new(bar_start, tick));
                Some(completed)
            }
            None => {
                self.current_bar = Some(BarBuilder::new(bar_start, tick));
                None
            }
        }
    }

    /// Finishes bucketing, returning any remaining partial bar.
    #[must_use]
    pub fn finish(self) -> Option<Bar> {
        self.current_bar.map(BarBuilder::finish)
    }
}

/// Builder for bars.
#[derive(Debug)]
struct BarBuilder {
    symbol: String,
    period_start: DateTime<Utc>,
    close_price: f64,
    volume: f64,
    tick_count: u32,
}

impl BarBuilder {
    fn new(period_start: DateTime<Utc>, tick: &Tick) -> Self {
        Self {
            symbol: tick.symbol.clone(),
            period_start,
            close_price: tick.price,
            volume: tick.quantity,
            tick_count: 1,
        }
    }

    fn update(&mut self, tick: &Tick) {
        self.close_price = tick.price;
        self.volume += tick.quantity;
        self.tick_count += 1;
    }

    fn finish(self) -> Bar {
        Bar::new(
            self.symbol,
            self.period_start,
            self.close_price,
            self.volume,
            self.tick_count,
        )
    }
}

/// Buckets ticks for one symbol into bars.
///
/// Ticks are stably sorted by timestamp first, so among ticks sharing the
/// latest timestamp in a bucket, the one that came last wins the close.
/// Ticks with a non-finite price or quantity are skipped. An empty input
/// yields no bars.
#[must_use]
pub fn bucket_ticks(ticks: &[Tick], interval: Interval) -> Vec<Bar> {
    let mut ordered: Vec<&Tick> = ticks.iter().filter(|t| t.is_finite()).collect();
    ordered.sort_by_key(|t| t.timestamp);

    let mut bucketer = TickBucketer::new(interval);
    let mut bars = Vec::new();

    for tick in ordered {
        if let Some(bar) = bucketer.process(tick) {
            bars.push(bar);
        }
    }

    if let Some(bar) = bucketer.finish() {
        bars.push(bar);
    }

    bars
}

/// Buckets a mixed-symbol tick snapshot into one bar series per symbol.
#[must_use]
pub fn bucket_by_symbol(ticks: &[Tick], interval: Interval) -> BarsBySymbol {
    let mut grouped: BTreeMap<&str, Vec<Tick>> = BTreeMap::new();
    for tick in ticks {
        grouped
            .entry(tick.symbol.as_str())
            .or_default()
            .push(tick.clone());
    }

    let bars: BarsBySymbol = grouped
        .into_iter()
        .map(|(symbol, ticks)| (symbol.to_string(), bucket_ticks(&ticks, interval)))
        .collect();

    debug!(
        symbols = bars.len(),
        interval = %interval,
        ticks = ticks.len(),
        "Bucketed tick snapshot"
    );

    bars
}
