//! Series schema contract — the boundary between upstream data and the engine.
//!
//! Defines the exact column names and ordering invariant a price series must
//! satisfy before any indicator runs. Column names are case-sensitive; dates
//! are strictly increasing and unique.

use chrono::NaiveDate;
use thiserror::Error;

/// Required columns of a series table, in canonical order.
pub const REQUIRED_COLUMNS: &[&str] = &["Date", "Open", "High", "Low", "Close", "Volume"];

/// Structured schema failures. Fatal to the one computation they guard,
/// never silently inferred around.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: date {date} is not strictly after the previous row")]
    NonIncreasingDate { row: usize, date: NaiveDate },

    #[error("row {row}: cannot parse date '{value}'")]
    BadDate { row: usize, value: String },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Validate a header row against the required column set.
///
/// Extra columns are allowed (they are ignored downstream); missing ones are
/// all reported at once. Matching is case-sensitive by contract.
pub fn validate_header(columns: &[&str]) -> Result<(), SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.contains(required))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_header_passes() {
        let cols = ["Date", "Open", "High", "Low", "Close", "Volume"];
        assert!(validate_header(&cols).is_ok());
    }

    #[test]
    fn extra_columns_are_allowed() {
        let cols = ["Date", "Open", "High", "Low", "Close", "Volume", "Adj Close"];
        assert!(validate_header(&cols).is_ok());
    }

    #[test]
    fn missing_columns_all_reported() {
        let cols = ["Date", "Open", "Close"];
        let err = validate_header(&cols).unwrap_err();
        match err {
            SchemaError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["High", "Low", "Volume"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn column_match_is_case_sensitive() {
        let cols = ["date", "open", "high", "low", "close", "volume"];
        let err = validate_header(&cols).unwrap_err();
        match err {
            SchemaError::MissingColumns(missing) => assert_eq!(missing.len(), 6),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
