//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single trading day.
///
/// `close` is the only column the schema requires to carry a value; the other
/// numeric fields may be `f64::NAN` for degenerate inputs (missing columns in
/// an uploaded CSV, alignment gaps). A NaN field means "no value", never zero.
/// Volume is kept as `f64` so a missing volume column can be represented the
/// same way as any other gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if the bar carries no usable close (void bar).
    pub fn is_void(&self) -> bool {
        self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high/low bracket open and close.
    pub fn is_sane(&self) -> bool {
        if self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
    }

    /// Typical price (high + low + close) / 3, the VWAP numerator input.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}
