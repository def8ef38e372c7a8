//! Moving Average Convergence Divergence (MACD).
//!
//! Three aligned series from one computation, exposed as separate named
//! `Indicator` instances (same pattern as multi-band indicators):
//! - line:      EMA(short) - EMA(long), defined from index long-1
//! - signal:    exponential smoothing of the line with span `signal`
//! - histogram: line - signal
//!
//! The signal line is NOT the two-step SMA-seeded EMA used elsewhere. It
//! starts accumulating at the first defined MACD value with continuous decay
//! (k = 2/(signal+1)) and withholds output until `signal` MACD values have
//! been observed. First defined signal index: long + signal - 2.

use super::ema::ema_seeded;
use super::{Indicator, IndicatorError};
use crate::domain::Bar;

/// Which of the three MACD series to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdSeries {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    short: usize,
    long: usize,
    signal: usize,
    series: MacdSeries,
    name: String,
}

impl Macd {
    pub fn line(short: usize, long: usize) -> Self {
        Self {
            short,
            long,
            signal: 9,
            series: MacdSeries::Line,
            name: format!("macd_{short}_{long}"),
        }
    }

    pub fn signal(short: usize, long: usize, signal: usize) -> Self {
        Self {
            short,
            long,
            signal,
            series: MacdSeries::Signal,
            name: format!("macd_signal_{short}_{long}_{signal}"),
        }
    }

    pub fn histogram(short: usize, long: usize, signal: usize) -> Self {
        Self {
            short,
            long,
            signal,
            series: MacdSeries::Histogram,
            name: format!("macd_hist_{short}_{long}_{signal}"),
        }
    }

    fn validate(&self, len: usize) -> Result<(), IndicatorError> {
        if self.short == 0 || self.signal == 0 {
            return Err(IndicatorError::InvalidWindow { window: 0, len });
        }
        if self.short >= self.long {
            return Err(IndicatorError::InvalidSpans {
                short: self.short,
                long: self.long,
            });
        }
        if self.long > len {
            return Err(IndicatorError::InvalidWindow {
                window: self.long,
                len,
            });
        }
        Ok(())
    }

    /// Compute all three series at once.
    fn compute_all(&self, bars: &[Bar]) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), IndicatorError> {
        let n = bars.len();
        self.validate(n)?;
        if bars.iter().all(|b| b.close.is_nan()) {
            return Err(IndicatorError::MissingColumn("Close"));
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let ema_short = ema_seeded(&closes, self.short);
        let ema_long = ema_seeded(&closes, self.long);

        let mut line = vec![f64::NAN; n];
        for i in 0..n {
            line[i] = ema_short[i] - ema_long[i]; // NaN until both defined
        }

        let k = 2.0 / (self.signal as f64 + 1.0);
        let mut signal = vec![f64::NAN; n];
        let mut state: Option<f64> = None;
        let mut observed = 0usize;
        for i in 0..n {
            let m = line[i];
            if m.is_nan() {
                continue;
            }
            let s = match state {
                None => m,
                Some(prev) => (m - prev) * k + prev,
            };
            state = Some(s);
            observed += 1;
            if observed >= self.signal {
                signal[i] = s;
            }
        }

        let mut histogram = vec![f64::NAN; n];
        for i in 0..n {
            histogram[i] = line[i] - signal[i];
        }

        Ok((line, signal, histogram))
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.series {
            MacdSeries::Line => self.long.saturating_sub(1),
            MacdSeries::Signal | MacdSeries::Histogram => {
                (self.long + self.signal).saturating_sub(2)
            }
        }
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, IndicatorError> {
        let (line, signal, histogram) = self.compute_all(bars)?;
        Ok(match self.series {
            MacdSeries::Line => line,
            MacdSeries::Signal => signal,
            MacdSeries::Histogram => histogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, Ema, DEFAULT_EPSILON};

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_line_is_ema_difference() {
        let bars = make_bars(&ramp(20));
        let line = Macd::line(3, 6).compute(&bars).unwrap();
        let short = Ema::new(3).compute(&bars).unwrap();
        let long = Ema::new(6).compute(&bars).unwrap();

        for i in 0..20 {
            if line[i].is_nan() {
                assert!(short[i].is_nan() || long[i].is_nan());
            } else {
                assert_approx(line[i], short[i] - long[i], DEFAULT_EPSILON);
            }
        }
    }

    #[test]
    fn macd_first_defined_indices() {
        let bars = make_bars(&ramp(40));
        let line = Macd::line(3, 6).compute(&bars).unwrap();
        let signal = Macd::signal(3, 6, 4).compute(&bars).unwrap();
        let hist = Macd::histogram(3, 6, 4).compute(&bars).unwrap();

        // Line defined from long-1 = 5.
        assert!(line[4].is_nan());
        assert!(!line[5].is_nan());
        // Signal defined after 4 line values: index 5 + 4 - 1 = 8.
        assert!(signal[7].is_nan());
        assert!(!signal[8].is_nan());
        assert!(hist[7].is_nan());
        assert!(!hist[8].is_nan());
    }

    #[test]
    fn macd_signal_recurrence_from_first_line_value() {
        let bars = make_bars(&ramp(15));
        let line = Macd::line(3, 6).compute(&bars).unwrap();
        let signal = Macd::signal(3, 6, 4).compute(&bars).unwrap();

        // Replay the adjust-free recurrence over the defined line values.
        let k = 2.0 / 5.0;
        let mut state = f64::NAN;
        let mut observed = 0;
        for i in 0..15 {
            if line[i].is_nan() {
                continue;
            }
            state = if observed == 0 {
                line[i]
            } else {
                (line[i] - state) * k + state
            };
            observed += 1;
            if observed >= 4 {
                assert_approx(signal[i], state, DEFAULT_EPSILON);
            } else {
                assert!(signal[i].is_nan());
            }
        }
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let bars = make_bars(&ramp(30));
        let line = Macd::line(3, 6).compute(&bars).unwrap();
        let signal = Macd::signal(3, 6, 4).compute(&bars).unwrap();
        let hist = Macd::histogram(3, 6, 4).compute(&bars).unwrap();
        for i in 0..30 {
            if !hist[i].is_nan() {
                assert_approx(hist[i], line[i] - signal[i], DEFAULT_EPSILON);
            }
        }
    }

    #[test]
    fn macd_constant_series_is_zero() {
        let bars = make_bars(&[100.0; 20]);
        let line = Macd::line(3, 6).compute(&bars).unwrap();
        let signal = Macd::signal(3, 6, 4).compute(&bars).unwrap();
        for i in 8..20 {
            assert_approx(line[i], 0.0, DEFAULT_EPSILON);
            assert_approx(signal[i], 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_short_must_be_less_than_long() {
        // The span-ordering error names the offending pair, so it cannot be
        // mistaken for a series-length problem.
        let bars = make_bars(&ramp(40));
        assert_eq!(
            Macd::line(26, 12).compute(&bars).unwrap_err(),
            IndicatorError::InvalidSpans { short: 26, long: 12 }
        );
        assert_eq!(
            Macd::line(12, 12).compute(&bars).unwrap_err(),
            IndicatorError::InvalidSpans { short: 12, long: 12 }
        );
    }

    #[test]
    fn macd_long_span_beyond_series_is_invalid() {
        let bars = make_bars(&ramp(10));
        let err = Macd::line(12, 26).compute(&bars).unwrap_err();
        assert_eq!(err, IndicatorError::InvalidWindow { window: 26, len: 10 });
    }

    #[test]
    fn macd_lookbacks() {
        assert_eq!(Macd::line(12, 26).lookback(), 25);
        assert_eq!(Macd::signal(12, 26, 9).lookback(), 33);
        assert_eq!(Macd::histogram(12, 26, 9).lookback(), 33);
    }
}
