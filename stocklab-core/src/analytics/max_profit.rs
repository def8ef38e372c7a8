//! Greedy maximum-profit extraction with buy/sell signal columns.
//!
//! Single pass from index 1: every strictly positive close-to-close delta is
//! taken as one buy-then-sell round trip (buy at i-1, sell at i). This is
//! exactly optimal for unlimited fee-free transactions with full exit before
//! re-entry: total profit equals the sum of all positive daily deltas.

use crate::domain::Bar;

/// Greedy trade extraction output.
///
/// `buy_signals`/`sell_signals` are aligned 1:1 with the input series. A bar
/// can be both a sell (closing the previous day's trade) and a buy (opening
/// the next) inside a monotonic rise.
#[derive(Debug, Clone)]
pub struct ProfitSignals {
    pub profit: f64,
    pub buy_count: usize,
    pub buy_signals: Vec<bool>,
    pub sell_signals: Vec<bool>,
}

/// Extract the greedy maximum profit and its signal columns.
pub fn greedy_profit(bars: &[Bar]) -> ProfitSignals {
    let n = bars.len();
    let mut buy_signals = vec![false; n];
    let mut sell_signals = vec![false; n];
    let mut profit = 0.0;

    for i in 1..n {
        let prev = bars[i - 1].close;
        let curr = bars[i].close;
        // NaN on either side fails the comparison, so gaps are skipped.
        if curr > prev {
            buy_signals[i - 1] = true;
            sell_signals[i] = true;
            profit += curr - prev;
        }
    }

    let buy_count = buy_signals.iter().filter(|&&b| b).count();
    ProfitSignals {
        profit,
        buy_count,
        buy_signals,
        sell_signals,
    }
}
