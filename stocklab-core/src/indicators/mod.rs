//! Indicator library — pure functions from bar history to aligned series.
//!
//! Every indicator implements the `Indicator` trait: a full bar series in, a
//! `Vec<f64>` of the same length out. Undefined positions (warmup, gaps) are
//! `f64::NAN`, never zero. Parameter problems are structured errors so one
//! bad indicator in a batch never aborts the others.
//!
//! Gap policy (applies to every recurrence-based indicator here): a NaN
//! source value makes that output NaN and, because the recurrences carry a
//! prior value forward, every subsequent output is NaN too. The recurrence
//! never re-seeds after a gap. Windowed indicators (SMA, VWAP) recover once
//! the gap leaves the window.

pub mod ema;
pub mod macd;
pub mod registry;
pub mod rsi;
pub mod sma;
pub mod vwap;

pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use registry::{apply, IndicatorBatch, IndicatorFailure, IndicatorSpec};
pub use rsi::Rsi;
pub use sma::Sma;
pub use vwap::Vwap;

use crate::domain::Bar;
use std::collections::HashMap;
use thiserror::Error;

/// Structured indicator failures.
///
/// `InvalidWindow` means the caller's parameters can never work for this
/// series ("bad config"); `InsufficientHistory` means the series is simply
/// too short so far ("not enough data yet"). Callers need to tell these
/// apart, so they stay distinct variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("invalid window {window} for series of length {len}")]
    InvalidWindow { window: usize, len: usize },

    #[error("invalid spans: short {short} must be less than long {long}")]
    InvalidSpans { short: usize, long: usize },

    #[error("insufficient history: need at least {required} bars, have {len}")]
    InsufficientHistory { required: usize, len: usize },

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Trait for indicators.
///
/// `compute` returns a series aligned 1:1 by position with `bars`; the first
/// `lookback()` values are NaN (warmup). No output at index t may depend on
/// data from index t+1 or later.
pub trait Indicator: Send + Sync {
    /// Column name this indicator produces (e.g. "sma_20", "macd_12_26").
    fn name(&self) -> &str;

    /// Number of bars consumed before the first defined output.
    fn lookback(&self) -> usize;

    /// Compute the full output series, or a structured error.
    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, IndicatorError>;
}

/// Container for computed indicator columns, keyed by name.
///
/// The engine appends one column per applied indicator; the input series is
/// never touched. Ownership of the container is the caller's.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Value of a named column at one row.
    pub fn get(&self, name: &str, index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| v.get(index).copied())
    }

    /// Full column by name.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Column names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
