//! Criterion benchmarks for portstat_core
//!
//! Run with: cargo bench -p portstat_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use portstat_core::asset_metrics::{MetricsConfig, asset_metrics};
use portstat_core::model::{
    Aggregation, CorrelationMethod, Rebalance, ReturnTensor, VarMethod, VarTail,
};
use portstat_core::portfolio::build_returns;
use portstat_core::stats::{sharpe_ratio, value_at_risk};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};

fn create_tensor(n_assets: usize, n_periods: usize, n_simulations: usize) -> ReturnTensor {
    let mut rng = SmallRng::seed_from_u64(42);
    let normal = Normal::new(0.06_f64, 0.15).unwrap();
    let data = (0..n_assets * n_periods * n_simulations)
        .map(|_| normal.sample(&mut rng).max(-0.95))
        .collect();
    ReturnTensor::from_data(n_assets, n_periods, n_simulations, data).unwrap()
}

fn bench_build_returns(c: &mut Criterion) {
    let tensor = create_tensor(25, 20, 10_000);
    let weights = vec![1.0 / 25.0; 25];

    let mut group = c.benchmark_group("build_returns");
    for rebalance in [Rebalance::Periodic, Rebalance::None] {
        group.bench_with_input(
            BenchmarkId::from_parameter(rebalance),
            &rebalance,
            |b, &rebalance| b.iter(|| build_returns(black_box(&weights), &tensor, rebalance)),
        );
    }
    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let tensor = create_tensor(25, 20, 10_000);
    let weights = vec![1.0 / 25.0; 25];
    let returns = build_returns(&weights, &tensor, Rebalance::Periodic).unwrap();

    c.bench_function("sharpe_ratio", |b| {
        b.iter(|| sharpe_ratio(black_box(&returns), 0.02, 1.0, Aggregation::Mean))
    });

    let mut group = c.benchmark_group("value_at_risk");
    for method in [VarMethod::Pooled, VarMethod::YearByYear, VarMethod::Cumulative] {
        group.bench_with_input(BenchmarkId::from_parameter(method), &method, |b, &method| {
            b.iter(|| value_at_risk(black_box(&returns), 0.95, method, VarTail::Left))
        });
    }
    group.finish();
}

fn bench_asset_metrics(c: &mut Criterion) {
    let tensor = create_tensor(10, 20, 2_000);
    let names: Vec<String> = (0..10).map(|i| format!("Asset{i}")).collect();
    let weights = vec![0.1; 10];

    let mut group = c.benchmark_group("asset_metrics");
    group.sample_size(20);
    for corr_method in [
        CorrelationMethod::Pooled,
        CorrelationMethod::YearByYear,
        CorrelationMethod::SimulationBySimulation,
    ] {
        let config = MetricsConfig {
            corr_method,
            ..MetricsConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(corr_method),
            &config,
            |b, config| b.iter(|| asset_metrics(black_box(&tensor), &names, &weights, config)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build_returns, bench_statistics, bench_asset_metrics);
criterion_main!(benches);
