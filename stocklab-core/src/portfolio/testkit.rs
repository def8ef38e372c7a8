//! Map-backed fake providers for unit tests.

use crate::data::{FxProvider, ProviderError, Quote, QuoteProvider};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

fn fixed_asof() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
}

/// Scripted quote source. Unlisted tickers fail with `Unavailable`.
#[derive(Default)]
pub struct FakeQuotes {
    prices: HashMap<String, f64>,
    currencies: HashMap<String, String>,
    closes: HashMap<String, Vec<(NaiveDate, f64)>>,
    calls: AtomicUsize,
}

impl FakeQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, ticker: &str, price: f64) -> Self {
        self.prices.insert(ticker.to_string(), price);
        self
    }

    pub fn with_currency(mut self, ticker: &str, currency: &str) -> Self {
        self.currencies
            .insert(ticker.to_string(), currency.to_string());
        self
    }

    pub fn with_closes(mut self, ticker: &str, closes: &[(NaiveDate, f64)]) -> Self {
        self.closes.insert(ticker.to_string(), closes.to_vec());
        self
    }

    /// Number of `latest_close` lookups performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuoteProvider for FakeQuotes {
    fn latest_close(&self, ticker: &str) -> Result<Quote, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let price = self
            .prices
            .get(ticker)
            .copied()
            .ok_or_else(|| ProviderError::Unavailable {
                key: ticker.to_string(),
            })?;
        Ok(Quote {
            ticker: ticker.to_string(),
            price,
            currency: self.currencies.get(ticker).cloned(),
            asof: fixed_asof(),
        })
    }

    fn recent_closes(
        &self,
        ticker: &str,
        _lookback_days: u32,
    ) -> Result<Vec<(NaiveDate, f64)>, ProviderError> {
        self.closes
            .get(ticker)
            .cloned()
            .ok_or_else(|| ProviderError::Unavailable {
                key: ticker.to_string(),
            })
    }
}

/// Scripted FX source. Unscripted pairs fail with `Unavailable`.
#[derive(Default)]
pub struct FakeFx {
    rates: HashMap<(String, String), f64>,
    calls: AtomicUsize,
}

impl FakeFx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.rates
            .insert((from.to_string(), to.to_string()), rate);
        self
    }

    /// Number of non-identity rate lookups performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FxProvider for FakeFx {
    fn rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        if from == to {
            return Ok(1.0);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| ProviderError::Unavailable {
                key: format!("{from}{to}=X"),
            })
    }
}
