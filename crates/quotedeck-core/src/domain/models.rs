use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime};

/// Upper cardinality of a series at the consuming edge.
pub const MAX_BARS: usize = 30;

/// Fixed lookback window for historical fetches, in calendar days.
pub const LOOKBACK_DAYS: i64 = 30;

/// Point-in-time price/volume record for one ticker.
///
/// Immutable once constructed: `change` and `change_percent` are derived at
/// construction and always satisfy `change == price - open` and
/// `change_percent == change / open * 100` when `open > 0`. When `open` is
/// zero, missing, or non-finite both derived fields are zero so no NaN or
/// infinity ever reaches a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: Symbol,
    pub price: f64,
    pub open: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub captured_at: UtcDateTime,
}

impl QuoteSnapshot {
    /// Build a snapshot from raw provider values, deriving the change fields.
    ///
    /// Raw values are sanitized with the lossy display policy: negative or
    /// non-finite inputs collapse to zero instead of erroring.
    pub fn derive(
        symbol: Symbol,
        price: f64,
        open: f64,
        volume: u64,
        captured_at: UtcDateTime,
    ) -> Self {
        let price = sanitize(price);
        let open = sanitize(open);

        let (change, change_percent) = if open > 0.0 {
            let change = price - open;
            (change, change / open * 100.0)
        } else {
            (0.0, 0.0)
        };

        Self {
            symbol,
            price,
            open,
            change,
            change_percent,
            volume,
            captured_at,
        }
    }

    /// All-zero snapshot used when a well-formed response carries no result
    /// row. Keeps the dashboard rendering path uniform.
    pub fn empty(symbol: Symbol, captured_at: UtcDateTime) -> Self {
        Self::derive(symbol, 0.0, 0.0, 0, captured_at)
    }
}

/// One aggregated open/high/low/close/volume record for a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Lossy constructor: negative or non-finite price fields collapse to
    /// zero rather than rejecting the bar.
    pub fn sanitized(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            ts,
            open: sanitize(open),
            high: sanitize(high),
            low: sanitize(low),
            close: sanitize(close),
            volume,
        }
    }
}

/// Ordered daily bar series for one ticker.
///
/// Invariants enforced at construction: ascending timestamps, no duplicate
/// timestamps (first occurrence wins), at most [`MAX_BARS`] bars with the
/// most recent retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub symbol: Symbol,
    pub bars: Vec<Bar>,
}

impl HistoricalSeries {
    pub fn from_bars(symbol: Symbol, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.ts);
        bars.dedup_by_key(|bar| bar.ts);
        if bars.len() > MAX_BARS {
            bars.drain(..bars.len() - MAX_BARS);
        }
        Self { symbol, bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in timestamp order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}
