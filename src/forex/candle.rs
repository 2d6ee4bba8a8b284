use serde::{Deserialize, Serialize};

/// A single OHLC price bar. `timestamp` is the bar start in epoch seconds, UTC.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Candle {
    #[serde(rename = "time")]
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Folds a later bar of the same period into this one.
    pub fn merge(&mut self, later: &Candle) {
        self.high = self.high.max(later.high);
        self.low = self.low.min(later.low);
        self.close = later.close;
        self.volume += later.volume;
    }
}

/// Keeps the last `count` candles of an ascending sequence.
pub fn keep_last(mut candles: Vec<Candle>, count: usize) -> Vec<Candle> {
    if candles.len() > count {
        candles.drain(..candles.len() - count);
    }
    candles
}
