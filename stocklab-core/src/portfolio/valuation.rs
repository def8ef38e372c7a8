//! Portfolio valuation in a single target currency.
//!
//! One pass over a portfolio: fetch each distinct ticker's latest quote once,
//! resolve its trading currency, convert to the target currency, and
//! aggregate. Any per-ticker quote or FX failure degrades that position to
//! unknown (NaN conversions, excluded from totals) instead of aborting the
//! pass. FX rates are cached for the duration of one call only.

use crate::data::{FxProvider, ProviderError, Quote, QuoteProvider};
use crate::domain::Portfolio;
use crate::portfolio::currency::{resolve_currency, UNKNOWN_CURRENCY};
use std::collections::HashMap;

/// One valued position. Fields that could not be determined hold NaN
/// (or `UNKNOWN` for the currency); the row stays visible either way.
#[derive(Debug, Clone)]
pub struct PositionValue {
    pub ticker: String,
    pub quantity: f64,
    pub price_per_share: f64,
    pub invested_value: f64,
    pub currency: String,
    pub current_price: f64,
    pub current_price_target: f64,
    pub current_value_target: f64,
    pub invested_value_target: f64,
}

/// Valuation result: detail rows plus target-currency aggregates.
///
/// Each total sums only the rows where that value is known; a position with
/// an unknown current value but a known invested value still contributes to
/// the invested total. `profit_loss_pct` is NaN when nothing was invested.
#[derive(Debug, Clone)]
pub struct Valuation {
    pub target_currency: String,
    pub positions: Vec<PositionValue>,
    pub total_invested_target: f64,
    pub total_current_target: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
}

/// FX lookup memoized for one valuation pass. Failures are cached too so a
/// dead currency pair is not retried per holding.
pub(crate) struct FxCache<'a> {
    provider: &'a dyn FxProvider,
    target: &'a str,
    rates: HashMap<String, Result<f64, ProviderError>>,
}

impl<'a> FxCache<'a> {
    pub(crate) fn new(provider: &'a dyn FxProvider, target: &'a str) -> Self {
        Self {
            provider,
            target,
            rates: HashMap::new(),
        }
    }

    pub(crate) fn rate(&mut self, from: &str) -> Result<f64, ProviderError> {
        if from == self.target {
            return Ok(1.0);
        }
        self.rates
            .entry(from.to_string())
            .or_insert_with(|| self.provider.rate(from, self.target))
            .clone()
    }
}

/// Value a portfolio against live quotes, converting everything to `target`.
pub fn value_portfolio(
    portfolio: &Portfolio,
    quotes: &dyn QuoteProvider,
    fx: &dyn FxProvider,
    target: &str,
) -> Valuation {
    // One quote fetch per distinct ticker, shared by duplicate holdings.
    let mut quote_cache: HashMap<&str, Result<Quote, ProviderError>> = HashMap::new();
    for ticker in portfolio.distinct_tickers() {
        quote_cache.insert(ticker, quotes.latest_close(ticker));
    }

    let mut fx_cache = FxCache::new(fx, target);
    let mut positions = Vec::with_capacity(portfolio.len());
    let mut total_invested_target = 0.0;
    let mut total_current_target = 0.0;

    for holding in portfolio.holdings() {
        let invested_value = holding.invested_value();
        let quote = quote_cache
            .get(holding.ticker.as_str())
            .and_then(|r| r.as_ref().ok());

        let currency = resolve_currency(
            &holding.ticker,
            quote.and_then(|q| q.currency.as_deref()),
        );

        let rate = if currency == UNKNOWN_CURRENCY {
            None
        } else {
            fx_cache.rate(&currency).ok()
        };

        let current_price = quote.map_or(f64::NAN, |q| q.price);
        let current_price_target = match rate {
            Some(r) => current_price * r,
            None => f64::NAN,
        };
        let current_value_target = current_price_target * holding.quantity;
        let invested_value_target = match rate {
            Some(r) => invested_value * r,
            None => f64::NAN,
        };

        if invested_value_target.is_finite() {
            total_invested_target += invested_value_target;
        }
        if current_value_target.is_finite() {
            total_current_target += current_value_target;
        }

        positions.push(PositionValue {
            ticker: holding.ticker.clone(),
            quantity: holding.quantity,
            price_per_share: holding.price_per_share,
            invested_value,
            currency,
            current_price,
            current_price_target,
            current_value_target,
            invested_value_target,
        });
    }

    let profit_loss = total_current_target - total_invested_target;
    let profit_loss_pct = if total_invested_target == 0.0 {
        f64::NAN
    } else {
        profit_loss / total_invested_target * 100.0
    };

    Valuation {
        target_currency: target.to_string(),
        positions,
        total_invested_target,
        total_current_target,
        profit_loss,
        profit_loss_pct,
    }
}
