//! Exponential Moving Average (EMA).
//!
//! Seed: EMA[window-1] = simple mean of the first `window` closes.
//! Then for i >= window: EMA[i] = (close[i] - EMA[i-1]) * k + EMA[i-1],
//! with k = 2 / (window + 1).
//!
//! Gap policy: the recurrence reads its own prior value, so a NaN close
//! poisons that index and everything after it. No re-seed after a gap.

use super::{Indicator, IndicatorError};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    window: usize,
    name: String,
}

impl Ema {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            name: format!("ema_{window}"),
        }
    }
}

impl Indicator for Ema {
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

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Ok(ema_seeded(&closes, self.window))
    }
}

/// EMA over a raw f64 slice with the SMA seed convention.
///
/// Shared with MACD, which needs EMAs of the close series at two spans.
/// Returns all-NaN when the slice is shorter than `window` or the seed
/// window contains a gap.
pub fn ema_seeded(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    let mut sum = 0.0;
    for &v in values.iter().take(window) {
        if v.is_nan() {
            return result; // gap inside the seed window
        }
        sum += v;
    }
    let seed = sum / window as f64;
    result[window - 1] = seed;

    let k = 2.0 / (window as f64 + 1.0);
    let mut prev = seed;
    for i in window..n {
        if values[i].is_nan() {
            // Recurrence is poisoned from here on.
            return result;
        }
        let ema = (values[i] - prev) * k + prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_window_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars).unwrap();
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // k = 2/(3+1) = 0.5
        // Seed at index 2: mean(10,11,12) = 11.0
        // EMA[3] = (13 - 11.0)*0.5 + 11.0 = 12.0
        // EMA[4] = (14 - 12.0)*0.5 + 12.0 = 13.0
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Ema::new(3).compute(&bars).unwrap();

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let bars = make_bars(&[7.0; 8]);
        let result = Ema::new(4).compute(&bars).unwrap();
        for &v in &result[3..] {
            assert_approx(v, 7.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_nan_in_seed_produces_all_nan() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        bars[1].close = f64::NAN;
        let result = Ema::new(3).compute(&bars).unwrap();
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_nan_after_seed_poisons_rest() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        bars[3].close = f64::NAN;
        let result = Ema::new(3).compute(&bars).unwrap();
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        assert!(result[5].is_nan()); // valid close, but recurrence never re-seeds
    }

    #[test]
    fn ema_window_longer_than_series_is_invalid() {
        let bars = make_bars(&[10.0, 11.0]);
        let err = Ema::new(3).compute(&bars).unwrap_err();
        assert_eq!(err, IndicatorError::InvalidWindow { window: 3, len: 2 });
    }

    #[test]
    fn ema_seeded_matches_indicator() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let via_trait = Ema::new(3).compute(&bars).unwrap();
        let via_slice = ema_seeded(&closes, 3);
        for i in 0..6 {
            if via_trait[i].is_nan() {
                assert!(via_slice[i].is_nan());
            } else {
                assert_approx(via_trait[i], via_slice[i], DEFAULT_EPSILON);
            }
        }
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(26).lookback(), 25);
        assert_eq!(Ema::new(1).lookback(), 0);
    }
}
