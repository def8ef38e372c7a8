//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! First defined value at index window-1.

use super::{Indicator, IndicatorError};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            name: format!("sma_{window}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, IndicatorError> {
        let n = bars.len();
        if self.window == 0 || self.window > n {
            return Err(IndicatorError::InvalidWindow {
                window: self.window,
                len: n,
            });
        }
        if bars.iter().all(|b| b.close.is_nan()) {
            return Err(IndicatorError::MissingColumn("Close"));
        }

        let mut result = vec![f64::NAN; n];

        // Rolling sum with a NaN count so a gap only blanks the windows
        // that contain it.
        let mut sum = 0.0;
        let mut nan_in_window = 0usize;
        for i in 0..n {
            let entering = bars[i].close;
            if entering.is_nan() {
                nan_in_window += 1;
            } else {
                sum += entering;
            }

            if i >= self.window {
                let leaving = bars[i - self.window].close;
                if leaving.is_nan() {
                    nan_in_window -= 1;
                } else {
                    sum -= leaving;
                }
            }

            if i + 1 >= self.window && nan_in_window == 0 {
                result[i] = sum / self.window as f64;
            }
        }

        Ok(result)
    }
}
