//! Quote/FX provider traits and structured error types.
//!
//! The engine never talks to the network itself; valuation and daily-return
//! code take these traits as injected dependencies so tests use fakes and
//! callers may fan out per-ticker lookups across threads (implementations
//! must be Sync).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latest close for one ticker, with its trading currency when the source
/// reports one. A price is only usable for aggregation once its currency is
/// known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: String,
    pub price: f64,
    pub currency: Option<String>,
    pub asof: NaiveDate,
}

/// Structured provider failures.
///
/// Every variant is a per-key outcome: one ticker or currency pair failing
/// must degrade that key only, never abort a whole valuation pass.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("no data available for '{key}'")]
    Unavailable { key: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),
}

/// Trait for price sources.
///
/// Implementations must tolerate unknown tickers by returning an error
/// (`Unavailable` / `SymbolNotFound`), never panicking.
pub trait QuoteProvider: Send + Sync {
    /// Most recent available close for a ticker.
    fn latest_close(&self, ticker: &str) -> Result<Quote, ProviderError>;

    /// Daily closes over a short trailing calendar window, oldest first.
    ///
    /// The window is calendar days, so weekends and holidays thin it out;
    /// callers take the last entries they need.
    fn recent_closes(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<Vec<(NaiveDate, f64)>, ProviderError>;
}

/// Trait for FX rate sources.
pub trait FxProvider: Send + Sync {
    /// Conversion rate from one currency to another.
    ///
    /// Implementations must return exactly 1.0 when `from == to` without
    /// hitting the network.
    fn rate(&self, from: &str, to: &str) -> Result<f64, ProviderError>;
}
