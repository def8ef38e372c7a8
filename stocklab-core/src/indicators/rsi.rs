//! Relative Strength Index (RSI) with Wilder smoothing.
//!
//! Seed at index `window`: arithmetic mean of the first `window` gains and
//! losses. After that: avg[i] = (avg[i-1] * (window-1) + x[i]) / window.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//!
//! Zero-denominator policy: avg_loss == 0 with gains present -> RSI 100;
//! both averages zero (flat window) -> RS defined as 0, so RSI 0. Never inf.

use super::{Indicator, IndicatorError};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    name: String,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            name: format!("rsi_{window}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, IndicatorError> {
        let n = bars.len();
        if self.window == 0 {
            return Err(IndicatorError::InvalidWindow {
                window: self.window,
                len: n,
            });
        }
        // One seed average needs window changes, i.e. window + 1 closes.
        if n <= self.window {
            return Err(IndicatorError::InsufficientHistory {
                required: self.window + 1,
                len: n,
            });
        }

        let mut result = vec![f64::NAN; n];

        // Signed close-to-close changes; NaN when either side is a gap.
        let mut changes = vec![f64::NAN; n];
        for i in 1..n {
            changes[i] = bars[i].close - bars[i - 1].close;
        }

        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for &ch in &changes[1..=self.window] {
            if ch.is_nan() {
                return Ok(result); // gap inside the seed window
            }
            if ch > 0.0 {
                avg_gain += ch;
            } else {
                avg_loss -= ch;
            }
        }
        avg_gain /= self.window as f64;
        avg_loss /= self.window as f64;

        result[self.window] = rsi_from_averages(avg_gain, avg_loss);

        let w = self.window as f64;
        for i in (self.window + 1)..n {
            if changes[i].is_nan() {
                // Wilder smoothing carries prior averages; a gap poisons
                // everything after it.
                return Ok(result);
            }
            let gain = changes[i].max(0.0);
            let loss = (-changes[i]).max(0.0);
            avg_gain = (avg_gain * (w - 1.0) + gain) / w;
            avg_loss = (avg_loss * (w - 1.0) + loss) / w;
            result[i] = rsi_from_averages(avg_gain, avg_loss);
        }

        Ok(result)
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            0.0 // flat window: RS defined as 0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
