//! CSV price-series ingestion.
//!
//! Reads an OHLCV table into `Vec<Bar>` under the schema contract: header is
//! validated up front, dates must parse as `%Y-%m-%d` and be strictly
//! increasing, and blank or unparsable numeric cells become NaN rather than
//! failing the load. Schema violations are fatal to the load; cell-level
//! noise is not.

use crate::domain::Bar;
use crate::schema::{validate_header, SchemaError};
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Load a series from a CSV file on disk.
pub fn load_series_csv(path: &Path) -> Result<Vec<Bar>, IngestError> {
    let file = File::open(path)?;
    read_series(file)
}

/// Read a series from any CSV source.
///
/// Column order in the file does not matter; cells are looked up by header
/// position. Rows shorter than the header are malformed input.
pub fn read_series<R: Read>(source: R) -> Result<Vec<Bar>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let header = reader.headers()?.clone();
    let columns: Vec<&str> = header.iter().collect();
    validate_header(&columns)?;

    let col = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .expect("column presence checked by validate_header")
    };
    let date_col = col("Date");
    let open_col = col("Open");
    let high_col = col("High");
    let low_col = col("Low");
    let close_col = col("Close");
    let volume_col = col("Volume");

    let mut bars = Vec::new();
    let mut prev_date: Option<NaiveDate> = None;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |idx: usize| -> Result<&str, SchemaError> {
            record.get(idx).ok_or_else(|| {
                SchemaError::MalformedInput(format!("row {row} has too few fields"))
            })
        };

        let date_raw = cell(date_col)?;
        let date = NaiveDate::parse_from_str(date_raw, DATE_FORMAT).map_err(|_| {
            SchemaError::BadDate {
                row,
                value: date_raw.to_string(),
            }
        })?;

        if let Some(prev) = prev_date {
            if date <= prev {
                return Err(SchemaError::NonIncreasingDate { row, date }.into());
            }
        }
        prev_date = Some(date);

        bars.push(Bar {
            date,
            open: parse_cell(cell(open_col)?),
            high: parse_cell(cell(high_col)?),
            low: parse_cell(cell(low_col)?),
            close: parse_cell(cell(close_col)?),
            volume: parse_cell(cell(volume_col)?),
        });
    }

    Ok(bars)
}

/// Blank or unparsable numeric cells become NaN.
fn parse_cell(raw: &str) -> f64 {
    if raw.is_empty() {
        return f64::NAN;
    }
    raw.parse().unwrap_or(f64::NAN)
}
