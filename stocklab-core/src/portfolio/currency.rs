//! Trading-currency resolution for tickers.
//!
//! Resolution chain: exchange-suffix table first, then the quote source's
//! reported currency, then `UNKNOWN`. A price tagged `UNKNOWN` is kept
//! visible in detail rows but never enters aggregate totals.

/// Yahoo-style exchange suffixes and the currency each exchange trades in.
pub const EXCHANGE_SUFFIXES: &[(&str, &str)] = &[
    (".T", "JPY"),
    (".DE", "EUR"),
    (".L", "GBP"),
    (".HK", "HKD"),
    (".SI", "SGD"),
];

/// Sentinel for a currency the resolution chain could not determine.
pub const UNKNOWN_CURRENCY: &str = "UNKNOWN";

/// Resolve a ticker's currency from its exchange suffix alone.
///
/// A suffix-less ticker is assumed US-listed (USD). A dotted suffix outside
/// the table returns None so the caller can fall back to the provider.
pub fn currency_from_suffix(ticker: &str) -> Option<&'static str> {
    match ticker.rfind('.') {
        None => Some("USD"),
        Some(idx) => {
            let suffix = &ticker[idx..];
            EXCHANGE_SUFFIXES
                .iter()
                .find(|(s, _)| *s == suffix)
                .map(|(_, currency)| *currency)
        }
    }
}

/// Full resolution chain: suffix table, then the provider-reported currency,
/// then `UNKNOWN`.
pub fn resolve_currency(ticker: &str, provider_currency: Option<&str>) -> String {
    currency_from_suffix(ticker)
        .map(str::to_string)
        .or_else(|| provider_currency.map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_CURRENCY.to_string())
}
