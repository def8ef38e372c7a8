//! StockLab CLI — indicator, trend, portfolio, and returns commands.
//!
//! Commands:
//! - `indicators` — apply an indicator set to an OHLCV CSV and print columns
//! - `analyze` — longest runs and greedy max-profit signals over a CSV
//! - `portfolio` — value a JSON holdings file via live Yahoo quotes and FX
//! - `returns` — day-over-day return per portfolio ticker

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use stocklab_core::analytics::{detect_runs, greedy_profit};
use stocklab_core::config::EngineConfig;
use stocklab_core::data::{
    load_series_csv, ProviderError, Quote, QuoteProvider, YahooProvider,
};
use stocklab_core::domain::{Portfolio, RunRecord};
use stocklab_core::indicators::{apply, IndicatorSpec};
use stocklab_core::portfolio::{daily_returns, value_portfolio, Valuation};

#[derive(Parser)]
#[command(
    name = "stocklab",
    about = "StockLab CLI — technical indicator and portfolio analytics engine"
)]
struct Cli {
    /// Path to a TOML config file (target currency, lookback window).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply indicators to an OHLCV CSV and print the trailing rows.
    Indicators {
        /// Path to a CSV with Date,Open,High,Low,Close,Volume columns.
        csv: PathBuf,

        /// Indicator specs (e.g. sma:20 ema:12 rsi macd:12,26,9 vwap).
        /// Defaults to the full dashboard set.
        #[arg(long = "spec")]
        specs: Vec<String>,

        /// Number of trailing rows to print.
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Longest up/down runs and greedy max-profit signals over a CSV.
    Analyze {
        /// Path to a CSV with Date,Open,High,Low,Close,Volume columns.
        csv: PathBuf,
    },
    /// Value a JSON holdings file against live quotes.
    Portfolio {
        /// Path to a JSON list of {ticker, price_per_share, quantity}.
        file: PathBuf,

        /// Target currency override (default from config, then SGD).
        #[arg(long)]
        target: Option<String>,
    },
    /// Day-over-day percentage return per portfolio ticker.
    Returns {
        /// Path to a JSON list of {ticker, price_per_share, quantity}.
        file: PathBuf,

        /// Target currency override (default from config, then SGD).
        #[arg(long)]
        target: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Indicators { csv, specs, tail } => run_indicators(&csv, &specs, tail),
        Commands::Analyze { csv } => run_analyze(&csv),
        Commands::Portfolio { file, target } => {
            let target = target.unwrap_or(config.target_currency);
            run_portfolio(&file, &config.owner.clone().unwrap_or_default(), &target)
        }
        Commands::Returns { file, target } => {
            let target = target.unwrap_or(config.target_currency);
            run_returns(
                &file,
                &config.owner.clone().unwrap_or_default(),
                &target,
                config.quote_lookback_days,
            )
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn run_indicators(csv: &Path, spec_strings: &[String], tail: usize) -> Result<()> {
    let bars = load_series_csv(csv).with_context(|| format!("loading {}", csv.display()))?;

    let specs = if spec_strings.is_empty() {
        IndicatorSpec::default_set()
    } else {
        spec_strings
            .iter()
            .map(|s| s.parse::<IndicatorSpec>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let batch = apply(&bars, &specs);
    for failure in &batch.failures {
        eprintln!("skipped {}: {}", failure.name, failure.error);
    }

    let mut names: Vec<&str> = batch.values.names().collect();
    names.sort_unstable();

    print!("{:<12}{:>12}", "Date", "Close");
    for name in &names {
        print!("{name:>18}");
    }
    println!();

    let start = bars.len().saturating_sub(tail);
    for (i, bar) in bars.iter().enumerate().skip(start) {
        print!("{:<12}{:>12}", bar.date, fmt_num(bar.close));
        for name in &names {
            let value = batch.values.get(name, i).unwrap_or(f64::NAN);
            print!("{:>18}", fmt_num(value));
        }
        println!();
    }

    Ok(())
}

fn run_analyze(csv: &Path) -> Result<()> {
    let bars = load_series_csv(csv).with_context(|| format!("loading {}", csv.display()))?;
    if bars.is_empty() {
        println!("No bars loaded.");
        return Ok(());
    }

    let analysis = detect_runs(&bars);
    let signals = greedy_profit(&bars);

    println!(
        "Series: {} bars, {} to {}",
        bars.len(),
        bars[0].date,
        bars[bars.len() - 1].date
    );
    let void = bars.iter().filter(|b| b.is_void()).count();
    let insane = bars.iter().filter(|b| !b.is_void() && !b.is_sane()).count();
    if void > 0 {
        println!("Data quality: {void} bar(s) without a close (skipped by streaks/profit)");
    }
    if insane > 0 {
        println!("Data quality: {insane} bar(s) fail OHLC sanity (high/low do not bracket open/close)");
    }
    print_run("Longest upward run", &analysis.longest_up);
    print_run("Longest downward run", &analysis.longest_down);
    println!(
        "Greedy max profit: {} over {} trades",
        fmt_num(signals.profit),
        signals.buy_count
    );

    Ok(())
}

fn print_run(label: &str, record: &RunRecord) {
    match (record.start, record.end) {
        (Some(start), Some(end)) => {
            println!("{label}: {} days ({start} to {end})", record.length)
        }
        _ => println!("{label}: none"),
    }
}

fn run_portfolio(file: &Path, owner: &str, target: &str) -> Result<()> {
    let portfolio = load_portfolio(file, owner)?;
    let yahoo = YahooProvider::new();
    let quotes = PrefetchedQuotes::fetch(&yahoo, &portfolio);

    let valuation = value_portfolio(&portfolio, &quotes, &yahoo, target);
    print_valuation(&valuation);
    Ok(())
}

fn run_returns(file: &Path, owner: &str, target: &str, lookback_days: u32) -> Result<()> {
    let portfolio = load_portfolio(file, owner)?;
    let yahoo = YahooProvider::new();
    let quotes = PrefetchedQuotes::fetch_closes(&yahoo, &portfolio, lookback_days);

    let returns = daily_returns(&portfolio, &quotes, &yahoo, target, lookback_days);
    if returns.is_empty() {
        println!("No return data available.");
        return Ok(());
    }

    println!(
        "{:<12}{:>12}{:>14}{:>18}",
        "Ticker",
        "Return %",
        "Close",
        format!("Close ({target})")
    );
    for (ticker, entry) in &returns {
        println!(
            "{:<12}{:>12}{:>14}{:>18}",
            ticker,
            fmt_opt(entry.daily_return_pct),
            fmt_opt(entry.latest_close),
            fmt_opt(entry.latest_close_target),
        );
    }
    Ok(())
}

fn load_portfolio(file: &Path, owner: &str) -> Result<Portfolio> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let portfolio = Portfolio::from_json_records(owner, &json)
        .with_context(|| format!("parsing {}", file.display()))?;
    Ok(portfolio)
}

fn print_valuation(valuation: &Valuation) {
    let target = &valuation.target_currency;
    println!(
        "{:<12}{:>10}{:>12}{:>10}{:>14}{:>16}{:>16}",
        "Ticker",
        "Quantity",
        "Buy Price",
        "Currency",
        "Price",
        format!("Value ({target})"),
        format!("Cost ({target})"),
    );
    for position in &valuation.positions {
        println!(
            "{:<12}{:>10}{:>12}{:>10}{:>14}{:>16}{:>16}",
            position.ticker,
            fmt_num(position.quantity),
            fmt_num(position.price_per_share),
            position.currency,
            fmt_num(position.current_price),
            fmt_num(position.current_value_target),
            fmt_num(position.invested_value_target),
        );
    }
    println!();
    println!(
        "Total invested: {} {target}",
        fmt_num(valuation.total_invested_target)
    );
    println!(
        "Total current:  {} {target}",
        fmt_num(valuation.total_current_target)
    );
    println!(
        "P&L:            {} {target} ({})",
        fmt_num(valuation.profit_loss),
        if valuation.profit_loss_pct.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:+.2}%", valuation.profit_loss_pct)
        }
    );
}

fn fmt_num(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.4}")
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), fmt_num)
}

/// Quote lookups fetched once, in parallel, before the valuation pass.
///
/// The engine walks holdings sequentially; fanning the network calls out
/// ahead of time keeps a 20-ticker portfolio from paying 20 round trips in
/// series. Keys not prefetched fall through to the live provider.
struct PrefetchedQuotes<'a> {
    inner: &'a YahooProvider,
    quotes: HashMap<String, Result<Quote, ProviderError>>,
    closes: HashMap<String, Result<Vec<(NaiveDate, f64)>, ProviderError>>,
}

impl<'a> PrefetchedQuotes<'a> {
    fn fetch(inner: &'a YahooProvider, portfolio: &Portfolio) -> Self {
        let quotes = portfolio
            .distinct_tickers()
            .par_iter()
            .map(|t| (t.to_string(), inner.latest_close(t)))
            .collect();
        Self {
            inner,
            quotes,
            closes: HashMap::new(),
        }
    }

    fn fetch_closes(inner: &'a YahooProvider, portfolio: &Portfolio, lookback_days: u32) -> Self {
        let closes = portfolio
            .distinct_tickers()
            .par_iter()
            .map(|t| (t.to_string(), inner.recent_closes(t, lookback_days)))
            .collect();
        Self {
            inner,
            quotes: HashMap::new(),
            closes,
        }
    }
}

impl QuoteProvider for PrefetchedQuotes<'_> {
    fn latest_close(&self, ticker: &str) -> Result<Quote, ProviderError> {
        match self.quotes.get(ticker) {
            Some(result) => result.clone(),
            None => self.inner.latest_close(ticker),
        }
    }

    fn recent_closes(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<Vec<(NaiveDate, f64)>, ProviderError> {
        match self.closes.get(ticker) {
            Some(result) => result.clone(),
            None => self.inner.recent_closes(ticker, lookback_days),
        }
    }
}
