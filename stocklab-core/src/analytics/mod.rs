//! Trend and signal analytics layered over a bar series.

pub mod max_profit;
pub mod runs;

pub use max_profit::{greedy_profit, ProfitSignals};
pub use runs::{detect_runs, RunAnalysis};
