//! Portfolio valuation and per-ticker daily returns.

pub mod currency;
pub mod daily_returns;
pub mod testkit;
pub mod valuation;

pub use currency::{currency_from_suffix, resolve_currency, UNKNOWN_CURRENCY};
pub use daily_returns::{daily_returns, DailyReturn};
pub use valuation::{value_portfolio, PositionValue, Valuation};
