//! StockLab Core — indicator and portfolio analytics engine over daily OHLCV bars.
//!
//! This crate contains the computation engine behind the dashboard:
//! - Domain types (bars, holdings, portfolios, run records)
//! - Series schema contract and CSV ingestion
//! - Indicator library (SMA, EMA, RSI, MACD, VWAP) behind a closed registry
//! - Trend analytics (longest up/down runs, greedy max-profit signals)
//! - Portfolio valuation and daily returns with multi-currency FX conversion
//! - Quote/FX provider traits plus the Yahoo Finance implementation
//!
//! The engine is synchronous and pure: every computation takes an in-memory
//! series or portfolio by reference and returns new derived data. The only
//! I/O lives behind the `QuoteProvider` / `FxProvider` traits so callers can
//! inject fakes for testing or fan out lookups themselves.

pub mod analytics;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod portfolio;
pub mod schema;
