//! Candlestick types and the live series update contract.
//!
//! `CandleSeries` mirrors the update semantics of a candlestick chart series:
//! a snapshot replaces everything, a tick either replaces the most recent bar
//! (same timestamp) or appends a new one (greater timestamp). Ticks that would
//! rewrite history are refused so the series never grows gaps or duplicate bars.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// One OHLC price bar for a fixed time interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar timestamp in unix seconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// Check that every price field is a finite number.
    pub fn is_well_formed(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }

    /// Validate this candle for use, rejecting NaN/infinite fields.
    pub fn validated(self) -> Result<Self> {
        if self.is_well_formed() {
            Ok(self)
        } else {
            Err(CoreError::InvalidCandle(format!(
                "non-finite field in candle at time {}",
                self.time
            )))
        }
    }
}

/// Outcome of applying a live tick to a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick carried the same timestamp as the last bar and replaced it.
    Replaced,
    /// Tick carried a newer timestamp and was appended.
    Appended,
    /// Tick carried an older timestamp and was dropped.
    Stale,
}

/// Ordered candle sequence with strictly increasing timestamps.
#[derive(Debug, Clone, Default)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent bar.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Second-to-last bar (the previous completed bar).
    pub fn prev(&self) -> Option<&Candle> {
        let len = self.candles.len();
        if len >= 2 {
            self.candles.get(len - 2)
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn clear(&mut self) {
        self.candles.clear();
    }

    /// Replace the whole series with a snapshot.
    ///
    /// Malformed candles and entries that would break the strictly increasing
    /// timestamp invariant are dropped. Returns the number of dropped records
    /// so the caller can log them.
    pub fn replace_all(&mut self, snapshot: Vec<Candle>) -> usize {
        let incoming = snapshot.len();
        self.candles.clear();
        for candle in snapshot {
            if !candle.is_well_formed() {
                continue;
            }
            match self.candles.last() {
                Some(last) if candle.time <= last.time => continue,
                _ => self.candles.push(candle),
            }
        }
        incoming - self.candles.len()
    }

    /// Apply one live tick: replace the last bar on an equal timestamp,
    /// append on a greater one, drop on an older one.
    pub fn apply_tick(&mut self, candle: Candle) -> TickOutcome {
        match self.candles.last_mut() {
            Some(last) if candle.time == last.time => {
                *last = candle;
                TickOutcome::Replaced
            }
            Some(last) if candle.time < last.time => TickOutcome::Stale,
            _ => {
                self.candles.push(candle);
                TickOutcome::Appended
            }
        }
    }
}
