//! Criterion benchmarks for engine hot paths.
//!
//! Benchmarks:
//! 1. Single indicators over growing series (SMA, EMA, RSI, VWAP, MACD)
//! 2. The default dashboard indicator batch
//! 3. Run detection and greedy profit extraction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stocklab_core::analytics::{detect_runs, greedy_profit};
use stocklab_core::domain::Bar;
use stocklab_core::indicators::{apply, Ema, Indicator, Macd, Rsi, Sma, Vwap, IndicatorSpec};

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + (i % 500_000) as f64,
            }
        })
        .collect()
}

fn bench_single_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_indicator");

    for &bar_count in &[252, 2520, 10_000] {
        let bars = make_bars(bar_count);

        group.bench_with_input(BenchmarkId::new("sma_20", bar_count), &bar_count, |b, _| {
            let sma = Sma::new(20);
            b.iter(|| sma.compute(black_box(&bars)));
        });

        group.bench_with_input(BenchmarkId::new("ema_26", bar_count), &bar_count, |b, _| {
            let ema = Ema::new(26);
            b.iter(|| ema.compute(black_box(&bars)));
        });

        group.bench_with_input(BenchmarkId::new("rsi_14", bar_count), &bar_count, |b, _| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.compute(black_box(&bars)));
        });

        group.bench_with_input(BenchmarkId::new("vwap", bar_count), &bar_count, |b, _| {
            let vwap = Vwap::new();
            b.iter(|| vwap.compute(black_box(&bars)));
        });

        group.bench_with_input(
            BenchmarkId::new("macd_signal_12_26_9", bar_count),
            &bar_count,
            |b, _| {
                let macd = Macd::signal(12, 26, 9);
                b.iter(|| macd.compute(black_box(&bars)));
            },
        );
    }

    group.finish();
}

fn bench_default_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_batch");

    let specs = IndicatorSpec::default_set();
    for &bar_count in &[252, 2520, 10_000] {
        let bars = make_bars(bar_count);
        group.bench_with_input(
            BenchmarkId::new("dashboard_set", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| apply(black_box(&bars), black_box(&specs)));
            },
        );
    }

    group.finish();
}

fn bench_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics");

    let bars = make_bars(10_000);
    group.bench_function("detect_runs_10k", |b| {
        b.iter(|| detect_runs(black_box(&bars)));
    });
    group.bench_function("greedy_profit_10k", |b| {
        b.iter(|| greedy_profit(black_box(&bars)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_indicators,
    bench_default_batch,
    bench_analytics,
);
criterion_main!(benches);
