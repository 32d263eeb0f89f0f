//! Pipeline benchmarks over a synthetic cointegrated pair.
//!
//! Run with: `cargo bench --package pairscope-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pairscope_bench::{SYMBOL_A, SYMBOL_B, synthetic_pair};
use pairscope_lib::{
    AnalyticsRequest, Interval, SqliteTickStore, TickSink, TickSource, run_analytics,
};
use std::hint::black_box;
use tempfile::TempDir;

fn pipeline_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for minutes in [240usize, 1_440, 10_080] {
        let ticks = synthetic_pair(minutes, 4);
        group.throughput(Throughput::Elements(ticks.len() as u64));

        let plain = AnalyticsRequest::new(SYMBOL_A, SYMBOL_B).with_window(30);
        group.bench_with_input(BenchmarkId::new("rolling+hedge", minutes), &ticks, |b, ticks| {
            b.iter(|| run_analytics(black_box(ticks), &plain).unwrap());
        });

        let with_adf = plain.clone().with_stationarity(true);
        group.bench_with_input(BenchmarkId::new("with-adf", minutes), &ticks, |b, ticks| {
            b.iter(|| run_analytics(black_box(ticks), &with_adf).unwrap());
        });
    }

    let ticks = synthetic_pair(1_440, 4);
    for interval in [Interval::seconds(15), Interval::minutes(5), Interval::hours(1)] {
        let request = AnalyticsRequest::new(SYMBOL_A, SYMBOL_B).with_interval(interval);
        group.bench_with_input(
            BenchmarkId::new("interval", interval.to_string()),
            &ticks,
            |b, ticks| b.iter(|| run_analytics(black_box(ticks), &request).unwrap()),
        );
    }

    group.finish();
}

fn store_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqlite");
    group.sample_size(20);

    let ticks = synthetic_pair(1_440, 4);
    let dir = TempDir::new().unwrap();
    let store = SqliteTickStore::open(dir.path().join("bench.db")).unwrap();
    store.append(&ticks).unwrap();

    for limit in [5_000usize, 50_000] {
        group.throughput(Throughput::Elements(limit as u64));
        group.bench_with_input(BenchmarkId::new("snapshot", limit), &limit, |b, &limit| {
            b.iter(|| store.snapshot(black_box(limit)).unwrap());
        });
    }

    group.bench_function("append-1000", |b| {
        b.iter_batched(
            || synthetic_pair(125, 4),
            |batch| store.append(&batch).unwrap(),
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, pipeline_benchmark, store_benchmark);
criterion_main!(benches);
