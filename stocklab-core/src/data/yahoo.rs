//! Yahoo Finance quote and FX provider.
//!
//! Fetches daily closes from Yahoo's v8 chart API. FX rates are fetched as
//! `{FROM}{TO}=X` symbols through the same endpoint. Yahoo has no official
//! API and changes formats without notice, so parse failures map to
//! `ResponseFormatChanged` and the engine degrades the affected ticker.

use super::provider::{FxProvider, ProviderError, Quote, QuoteProvider};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

/// Parsed chart payload: dated closes (oldest first) plus the instrument's
/// trading currency when Yahoo reports one.
#[derive(Debug)]
struct ChartCloses {
    closes: Vec<(NaiveDate, f64)>,
    currency: Option<String>,
}

/// Yahoo Finance provider for both quotes and FX rates.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    fn chart_url(symbol: &str, lookback_days: u32) -> String {
        let now = Utc::now();
        let start = now - ChronoDuration::days(i64::from(lookback_days));
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={}&period2={}&interval=1d",
            start.timestamp(),
            now.timestamp()
        )
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<ChartCloses, ProviderError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    ProviderError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    ProviderError::ResponseFormatChanged(format!(
                        "{}: {}",
                        err.code, err.description
                    ))
                }
            } else {
                ProviderError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result.into_iter().next().ok_or_else(|| {
            ProviderError::ResponseFormatChanged("result array is empty".into())
        })?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| ProviderError::ResponseFormatChanged("no timestamps".into()))?;
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ResponseFormatChanged("no quote block".into()))?;

        let mut closes = Vec::with_capacity(timestamps.len());
        for (ts, close) in timestamps.iter().zip(quote.close.iter()) {
            if let (Some(dt), Some(price)) = (DateTime::from_timestamp(*ts, 0), close) {
                if price.is_finite() && *price > 0.0 {
                    closes.push((dt.date_naive(), *price));
                }
            }
        }

        Ok(ChartCloses {
            closes,
            currency: data.meta.and_then(|m| m.currency),
        })
    }

    /// Fetch and parse dated closes with bounded retries on transport errors.
    fn fetch_chart(&self, symbol: &str, lookback_days: u32) -> Result<ChartCloses, ProviderError> {
        let url = Self::chart_url(symbol, lookback_days);
        let mut last_err = ProviderError::Unavailable {
            key: symbol.to_string(),
        };

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                std::thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
            }

            let response = match self.client.get(&url).send() {
                Ok(r) => r,
                Err(e) => {
                    last_err = ProviderError::NetworkUnreachable(e.to_string());
                    continue;
                }
            };

            match response.status().as_u16() {
                404 => {
                    return Err(ProviderError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    })
                }
                429 => {
                    last_err = ProviderError::RateLimited;
                    continue;
                }
                code if code >= 400 => {
                    last_err =
                        ProviderError::ResponseFormatChanged(format!("HTTP status {code}"));
                    continue;
                }
                _ => {}
            }

            let parsed: ChartResponse = response
                .json()
                .map_err(|e| ProviderError::ResponseFormatChanged(e.to_string()))?;
            return Self::parse_response(symbol, parsed);
        }

        Err(last_err)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteProvider for YahooProvider {
    fn latest_close(&self, ticker: &str) -> Result<Quote, ProviderError> {
        // 10 calendar days guarantees at least two sessions across any
        // weekend/holiday cluster.
        let chart = self.fetch_chart(ticker, 10)?;
        let (asof, price) = chart
            .closes
            .last()
            .copied()
            .ok_or_else(|| ProviderError::Unavailable {
                key: ticker.to_string(),
            })?;
        Ok(Quote {
            ticker: ticker.to_string(),
            price,
            currency: chart.currency,
            asof,
        })
    }

    fn recent_closes(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<Vec<(NaiveDate, f64)>, ProviderError> {
        Ok(self.fetch_chart(ticker, lookback_days)?.closes)
    }
}

impl FxProvider for YahooProvider {
    fn rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        if from == to {
            return Ok(1.0);
        }
        let pair = format!("{from}{to}=X");
        let chart = self.fetch_chart(&pair, 10)?;
        chart
            .closes
            .last()
            .map(|&(_, rate)| rate)
            .ok_or(ProviderError::Unavailable { key: pair })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_contains_symbol_and_interval() {
        let url = YahooProvider::chart_url("C6L.SI", 5);
        assert!(url.contains("/chart/C6L.SI"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn parse_response_extracts_closes_and_currency() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": { "currency": "SGD" },
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": { "quote": [{ "close": [6.1, null, 6.3] }] }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let chart = YahooProvider::parse_response("C6L.SI", resp).unwrap();
        assert_eq!(chart.currency.as_deref(), Some("SGD"));
        // The null close is dropped.
        assert_eq!(chart.closes.len(), 2);
        assert_eq!(chart.closes[0].1, 6.1);
        assert_eq!(chart.closes[1].1, 6.3);
    }

    #[test]
    fn parse_response_maps_not_found() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found" }
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = YahooProvider::parse_response("BOGUS", resp).unwrap_err();
        assert!(matches!(err, ProviderError::SymbolNotFound { .. }));
    }

    #[test]
    fn parse_response_rejects_empty_result() {
        let json = r#"{ "chart": { "result": [], "error": null } }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = YahooProvider::parse_response("SPY", resp).unwrap_err();
        assert!(matches!(err, ProviderError::ResponseFormatChanged(_)));
    }
}
