//! Volume Weighted Average Price (VWAP), cumulative over the whole series.
//!
//! vwap[i] = cumsum(typical_price * volume)[0..=i] / cumsum(volume)[0..=i]
//! with typical_price = (high + low + close) / 3. Defined from index 0,
//! never resets (single continuous session assumption).
//!
//! A bar with any NaN input is excluded from the running sums and its own
//! output is NaN; accumulation continues on the next clean bar. Zero
//! cumulative volume yields NaN, not an error.

use super::{Indicator, IndicatorError};
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, IndicatorError> {
        let n = bars.len();
        if n > 0 {
            if bars.iter().all(|b| b.high.is_nan()) {
                return Err(IndicatorError::MissingColumn("High"));
            }
            if bars.iter().all(|b| b.low.is_nan()) {
                return Err(IndicatorError::MissingColumn("Low"));
            }
            if bars.iter().all(|b| b.close.is_nan()) {
                return Err(IndicatorError::MissingColumn("Close"));
            }
            if bars.iter().all(|b| b.volume.is_nan()) {
                return Err(IndicatorError::MissingColumn("Volume"));
            }
        }

        let mut result = vec![f64::NAN; n];
        let mut cum_pv = 0.0;
        let mut cum_vol = 0.0;
        for (i, bar) in bars.iter().enumerate() {
            let pv = bar.typical_price() * bar.volume;
            if pv.is_nan() {
                continue;
            }
            cum_pv += pv;
            cum_vol += bar.volume;
            if cum_vol > 0.0 {
                result[i] = cum_pv / cum_vol;
            }
        }

        Ok(result)
    }
}
