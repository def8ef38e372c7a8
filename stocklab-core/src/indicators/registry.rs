//! Closed indicator registry — tagged specs, defaults, and batch dispatch.
//!
//! The dashboard selects indicators by identifier; the engine maps each
//! identifier to a concrete implementation plus default parameters. The set
//! is closed (an enum, not string lookup), so an unknown identifier is a
//! parse error at the edge rather than a runtime dispatch failure.

use super::{Ema, Indicator, IndicatorError, IndicatorValues, Macd, Rsi, Sma, Vwap};
use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Default MACD spans (short, long, signal).
pub const DEFAULT_MACD: (usize, usize, usize) = (12, 26, 9);
/// Default RSI window.
pub const DEFAULT_RSI_WINDOW: usize = 14;

/// One requested indicator with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorSpec {
    Sma { window: usize },
    Ema { window: usize },
    Rsi { window: usize },
    Macd { short: usize, long: usize, signal: usize },
    Vwap,
}

impl IndicatorSpec {
    /// The dashboard's default selection list.
    pub fn default_set() -> Vec<IndicatorSpec> {
        let (short, long, signal) = DEFAULT_MACD;
        vec![
            IndicatorSpec::Sma { window: 20 },
            IndicatorSpec::Sma { window: 50 },
            IndicatorSpec::Sma { window: 200 },
            IndicatorSpec::Vwap,
            IndicatorSpec::Ema { window: 12 },
            IndicatorSpec::Ema { window: 26 },
            IndicatorSpec::Rsi {
                window: DEFAULT_RSI_WINDOW,
            },
            IndicatorSpec::Macd { short, long, signal },
        ]
    }

    /// Instantiate the concrete indicator(s) for this spec.
    ///
    /// MACD expands into its three named series; everything else is one
    /// instance.
    pub fn build(&self) -> Vec<Box<dyn Indicator>> {
        match *self {
            IndicatorSpec::Sma { window } => vec![Box::new(Sma::new(window))],
            IndicatorSpec::Ema { window } => vec![Box::new(Ema::new(window))],
            IndicatorSpec::Rsi { window } => vec![Box::new(Rsi::new(window))],
            IndicatorSpec::Macd { short, long, signal } => vec![
                Box::new(Macd::line(short, long)),
                Box::new(Macd::signal(short, long, signal)),
                Box::new(Macd::histogram(short, long, signal)),
            ],
            IndicatorSpec::Vwap => vec![Box::new(Vwap::new())],
        }
    }
}

/// Parse failure for a spec string at the CLI/config edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown indicator spec '{0}' (expected e.g. sma:20, ema:12, rsi:14, macd:12,26,9, vwap)")]
pub struct ParseSpecError(pub String);

impl FromStr for IndicatorSpec {
    type Err = ParseSpecError;

    /// Accepts `sma:20`, `ema:26`, `rsi` (default 14), `macd` (12,26,9),
    /// `macd:12,26,9`, and `vwap`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseSpecError(s.to_string());
        let (kind, args) = match s.split_once(':') {
            Some((k, a)) => (k.trim(), Some(a.trim())),
            None => (s.trim(), None),
        };

        let one_window = |args: Option<&str>, default: Option<usize>| -> Result<usize, ParseSpecError> {
            match args {
                Some(a) => a.parse::<usize>().map_err(|_| bad()),
                None => default.ok_or_else(bad),
            }
        };

        match kind {
            "sma" => Ok(IndicatorSpec::Sma {
                window: one_window(args, None)?,
            }),
            "ema" => Ok(IndicatorSpec::Ema {
                window: one_window(args, None)?,
            }),
            "rsi" => Ok(IndicatorSpec::Rsi {
                window: one_window(args, Some(DEFAULT_RSI_WINDOW))?,
            }),
            "vwap" if args.is_none() => Ok(IndicatorSpec::Vwap),
            "macd" => {
                let (short, long, signal) = match args {
                    None => DEFAULT_MACD,
                    Some(a) => {
                        let parts: Vec<usize> = a
                            .split(',')
                            .map(|p| p.trim().parse::<usize>())
                            .collect::<Result<_, _>>()
                            .map_err(|_| bad())?;
                        match parts.as_slice() {
                            [s, l, g] => (*s, *l, *g),
                            _ => return Err(bad()),
                        }
                    }
                };
                Ok(IndicatorSpec::Macd { short, long, signal })
            }
            _ => Err(bad()),
        }
    }
}

/// One indicator that failed within a batch.
#[derive(Debug, Clone)]
pub struct IndicatorFailure {
    pub name: String,
    pub error: IndicatorError,
}

/// Result of applying a batch of indicator specs to one series.
///
/// Failures are collected per indicator; a bad window on one spec never
/// aborts or corrupts the others.
#[derive(Debug, Clone, Default)]
pub struct IndicatorBatch {
    pub values: IndicatorValues,
    pub failures: Vec<IndicatorFailure>,
}

/// Apply an ordered set of indicator specs to a series.
///
/// Each spec is computed independently against the same input bars; outputs
/// are appended as named columns. Indicators never read each other's output
/// columns (MACD's internal EMA use is internal to its own computation).
pub fn apply(bars: &[Bar], specs: &[IndicatorSpec]) -> IndicatorBatch {
    let mut batch = IndicatorBatch::default();
    for spec in specs {
        for indicator in spec.build() {
            match indicator.compute(bars) {
                Ok(series) => batch.values.insert(indicator.name(), series),
                Err(error) => batch.failures.push(IndicatorFailure {
                    name: indicator.name().to_string(),
                    error,
                }),
            }
        }
    }
    batch
}
