//! Holdings and portfolios — the input shape for valuation.

use crate::schema::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One portfolio position as the user entered it.
///
/// `price_per_share` is the purchase price, not the live quote. A holding
/// whose price could not be parsed keeps `f64::NAN` there so downstream
/// multiplication produces "unknown" instead of a false zero; an unparsable
/// quantity is coerced to 0 instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub price_per_share: f64,
    pub quantity: f64,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, price_per_share: f64, quantity: f64) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            price_per_share,
            quantity,
        }
    }

    /// What the user paid for this position. NaN when the price is unknown.
    pub fn invested_value(&self) -> f64 {
        self.price_per_share * self.quantity
    }
}

/// Insertion-ordered collection of holdings for one named owner.
///
/// Edits arrive as a whole-table snapshot: `replace_holdings` overwrites the
/// previous list rather than merging. That matches the persistence layer's
/// replace-on-edit contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    pub owner: String,
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            holdings: Vec::new(),
        }
    }

    /// Append a holding, preserving insertion order.
    pub fn push(&mut self, holding: Holding) {
        self.holdings.push(holding);
    }

    /// Replace the entire holdings list with an edited snapshot.
    pub fn replace_holdings(&mut self, holdings: Vec<Holding>) {
        self.holdings = holdings;
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    /// Distinct tickers in first-seen order.
    pub fn distinct_tickers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for h in &self.holdings {
            if !seen.contains(&h.ticker.as_str()) {
                seen.push(h.ticker.as_str());
            }
        }
        seen
    }

    /// Parse the persisted record list: `[{ticker, price_per_share, quantity}, ..]`.
    ///
    /// Fields may arrive as JSON numbers or strings (the storage layer does
    /// not guarantee types). A record missing any required field fails the
    /// whole load with a `SchemaError` naming the missing columns.
    pub fn from_json_records(owner: impl Into<String>, json: &str) -> Result<Self, SchemaError> {
        let records: Vec<Value> = serde_json::from_str(json)
            .map_err(|e| SchemaError::MalformedInput(e.to_string()))?;

        let mut portfolio = Self::new(owner);
        for record in &records {
            let mut missing = Vec::new();
            let ticker = field_str(record, "ticker", &mut missing);
            let price = field_value(record, "price_per_share", &mut missing);
            let quantity = field_value(record, "quantity", &mut missing);
            if !missing.is_empty() {
                return Err(SchemaError::MissingColumns(missing));
            }
            portfolio.push(Holding::new(
                ticker,
                coerce_number(&price).unwrap_or(f64::NAN),
                coerce_number(&quantity).unwrap_or(0.0),
            ));
        }
        Ok(portfolio)
    }
}

fn field_str(record: &Value, name: &str, missing: &mut Vec<String>) -> String {
    match record.get(name).and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => match record.get(name) {
            Some(v) => v.to_string(),
            None => {
                missing.push(name.to_string());
                String::new()
            }
        },
    }
}

fn field_value(record: &Value, name: &str, missing: &mut Vec<String>) -> Value {
    match record.get(name) {
        Some(v) => v.clone(),
        None => {
            missing.push(name.to_string());
            Value::Null
        }
    }
}

/// Accept numbers or numeric strings; anything else is None.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_uppercased() {
        let h = Holding::new("c6l.si", 5.0, 10.0);
        assert_eq!(h.ticker, "C6L.SI");
    }

    #[test]
    fn replace_holdings_overwrites() {
        let mut p = Portfolio::new("alice");
        p.push(Holding::new("AAPL", 150.0, 2.0));
        p.push(Holding::new("MSFT", 300.0, 1.0));
        p.replace_holdings(vec![Holding::new("SPY", 400.0, 1.0)]);
        assert_eq!(p.len(), 1);
        assert_eq!(p.holdings()[0].ticker, "SPY");
    }

    #[test]
    fn distinct_tickers_preserve_order() {
        let mut p = Portfolio::new("alice");
        p.push(Holding::new("MSFT", 300.0, 1.0));
        p.push(Holding::new("AAPL", 150.0, 2.0));
        p.push(Holding::new("msft", 310.0, 1.0));
        assert_eq!(p.distinct_tickers(), vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn json_records_roundtrip() {
        let json = r#"[{"ticker": "aapl", "price_per_share": 150.5, "quantity": 2}]"#;
        let p = Portfolio::from_json_records("alice", json).unwrap();
        assert_eq!(p.holdings()[0].ticker, "AAPL");
        assert_eq!(p.holdings()[0].price_per_share, 150.5);
        assert_eq!(p.holdings()[0].quantity, 2.0);
    }

    #[test]
    fn json_records_accept_string_numbers() {
        let json = r#"[{"ticker": "SPY", "price_per_share": "400.25", "quantity": "3"}]"#;
        let p = Portfolio::from_json_records("alice", json).unwrap();
        assert_eq!(p.holdings()[0].price_per_share, 400.25);
        assert_eq!(p.holdings()[0].quantity, 3.0);
    }

    #[test]
    fn json_records_coercion_policy() {
        // Unparsable quantity -> 0, unparsable price -> NaN.
        let json = r#"[{"ticker": "SPY", "price_per_share": "??", "quantity": "??"}]"#;
        let p = Portfolio::from_json_records("alice", json).unwrap();
        assert!(p.holdings()[0].price_per_share.is_nan());
        assert_eq!(p.holdings()[0].quantity, 0.0);
    }

    #[test]
    fn json_records_missing_field_is_schema_error() {
        let json = r#"[{"ticker": "SPY", "quantity": 3}]"#;
        let err = Portfolio::from_json_records("alice", json).unwrap_err();
        match err {
            SchemaError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["price_per_share".to_string()])
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
