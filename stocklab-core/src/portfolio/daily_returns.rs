//! Day-over-day return per distinct portfolio ticker.
//!
//! Each ticker needs its last two available closes. Weekends and holidays
//! are tolerated by requesting a short trailing calendar window and taking
//! the final two non-missing closes inside it. Fewer than two closes means
//! no return, not an error; a ticker whose lookup fails keeps an empty entry;
//! and when every lookup fails the result is an empty map.

use crate::data::{FxProvider, QuoteProvider};
use crate::domain::Portfolio;
use crate::portfolio::currency::{currency_from_suffix, resolve_currency, UNKNOWN_CURRENCY};
use crate::portfolio::valuation::FxCache;
use std::collections::BTreeMap;

/// Per-ticker daily return entry. All fields may be unknown independently.
#[derive(Debug, Clone, Default)]
pub struct DailyReturn {
    pub daily_return_pct: Option<f64>,
    pub latest_close: Option<f64>,
    pub latest_close_target: Option<f64>,
    pub currency: String,
}

/// Compute daily returns for every distinct ticker in a portfolio.
///
/// `lookback_days` is the trailing calendar window requested per ticker.
pub fn daily_returns(
    portfolio: &Portfolio,
    quotes: &dyn QuoteProvider,
    fx: &dyn FxProvider,
    target: &str,
    lookback_days: u32,
) -> BTreeMap<String, DailyReturn> {
    let mut fx_cache = FxCache::new(fx, target);
    let mut results = BTreeMap::new();
    let mut successes = 0usize;

    for ticker in portfolio.distinct_tickers() {
        let closes = match quotes.recent_closes(ticker, lookback_days) {
            Ok(closes) => closes,
            Err(_) => {
                results.insert(
                    ticker.to_string(),
                    DailyReturn {
                        currency: UNKNOWN_CURRENCY.to_string(),
                        ..Default::default()
                    },
                );
                continue;
            }
        };
        successes += 1;

        let valid: Vec<f64> = closes
            .iter()
            .map(|&(_, close)| close)
            .filter(|c| c.is_finite())
            .collect();

        let latest_close = valid.last().copied();
        let daily_return_pct = match valid.as_slice() {
            [.., prev, latest] if *prev != 0.0 => Some((latest - prev) / prev * 100.0),
            _ => None,
        };

        // Suffix first; one extra quote lookup only when the suffix is
        // inconclusive.
        let currency = match currency_from_suffix(ticker) {
            Some(c) => c.to_string(),
            None => {
                let reported = quotes
                    .latest_close(ticker)
                    .ok()
                    .and_then(|q| q.currency);
                resolve_currency(ticker, reported.as_deref())
            }
        };

        let latest_close_target = match (latest_close, currency.as_str()) {
            (Some(close), c) if c != UNKNOWN_CURRENCY => {
                fx_cache.rate(c).ok().map(|rate| close * rate)
            }
            _ => None,
        };

        results.insert(
            ticker.to_string(),
            DailyReturn {
                daily_return_pct,
                latest_close,
                latest_close_target,
                currency,
            },
        );
    }

    // Total provider failure yields an empty map, not a map of husks.
    if successes == 0 {
        return BTreeMap::new();
    }
    results
}
