//! Data boundary: provider traits, the Yahoo Finance implementation, and
//! CSV series ingestion.

pub mod ingest;
pub mod provider;
pub mod yahoo;

pub use ingest::{load_series_csv, read_series, IngestError};
pub use provider::{FxProvider, ProviderError, Quote, QuoteProvider};
pub use yahoo::YahooProvider;
