//! Invariants checked over randomly generated return tensors
//!
//! These tests verify that:
//! - A single fully-weighted asset reproduces its own return series
//! - Renormalized weights always sum to one
//! - Maximum drawdown is never negative
//! - Pooled VaR rises as confidence falls, and CVaR never exceeds VaR
//! - Correlation output is symmetric with a unit diagonal

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::asset_metrics::{MetricsConfig, asset_metrics};
use crate::model::{Aggregation, CorrelationMethod, Rebalance, VarMethod, VarTail};
use crate::portfolio::build_returns;
use crate::selection::{CategoryFilter, WEIGHT_SUM_TOLERANCE, select_and_normalize};
use crate::stats::{conditional_value_at_risk, drawdown_per_simulation, value_at_risk};

use super::random_tensor;

fn random_weights(rng: &mut SmallRng, n: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..n).map(|_| rng.random_range(0.01..1.0)).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

#[test]
fn test_single_asset_periodic_reproduces_series() {
    let tensor = random_tensor(1, 4, 6, 25);
    for a in 0..tensor.n_assets() {
        let mut weights = vec![0.0; tensor.n_assets()];
        weights[a] = 1.0;
        let returns = build_returns(&weights, &tensor, Rebalance::Periodic).unwrap();
        assert_eq!(returns.as_slice(), tensor.asset(a));
    }
}

#[test]
fn test_renormalized_weights_sum_to_one() {
    let mut rng = SmallRng::seed_from_u64(7);
    let categories: Vec<String> = ["Equity", "Bond", "Equity", "Cash", "Real Estate", "Bond"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let filters = [
        CategoryFilter::all(),
        CategoryFilter::new(Some(&["Equity".to_string()][..]), None).unwrap(),
        CategoryFilter::new(None, Some(&["Bond".to_string(), "Cash".to_string()][..])).unwrap(),
    ];

    for _ in 0..50 {
        let weights = random_weights(&mut rng, categories.len());
        for filter in &filters {
            let selection = select_and_normalize(&weights, &categories, filter).unwrap();
            let sum: f64 = selection.weights.iter().sum();
            assert!((sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        }
    }
}

#[test]
fn test_drawdown_is_non_negative() {
    let tensor = random_tensor(2, 3, 12, 40);
    let mut rng = SmallRng::seed_from_u64(2);
    for rebalance in [Rebalance::Periodic, Rebalance::None] {
        let weights = random_weights(&mut rng, 3);
        let returns = build_returns(&weights, &tensor, rebalance).unwrap();
        let drawdowns = drawdown_per_simulation(&returns).unwrap();
        assert!(drawdowns.iter().all(|d| *d >= 0.0 && *d <= 1.0));
    }
}

#[test]
fn test_var_monotone_in_confidence() {
    let tensor = random_tensor(3, 2, 10, 200);
    let returns = build_returns(&[0.5, 0.5], &tensor, Rebalance::Periodic).unwrap();

    let mut previous = f64::NEG_INFINITY;
    for confidence in [0.99, 0.975, 0.95, 0.9, 0.75, 0.5] {
        let var = value_at_risk(&returns, confidence, VarMethod::Pooled, VarTail::Left)
            .unwrap()
            .as_scalar()
            .unwrap();
        assert!(var >= previous, "VaR fell from {previous} to {var} at {confidence}");
        previous = var;
    }
}

#[test]
fn test_cvar_never_exceeds_var() {
    let tensor = random_tensor(4, 3, 8, 120);
    let returns = build_returns(&[0.2, 0.5, 0.3], &tensor, Rebalance::None).unwrap();

    for method in [VarMethod::Pooled, VarMethod::YearByYear, VarMethod::Cumulative] {
        for confidence in [0.9, 0.95, 0.99] {
            let var = value_at_risk(&returns, confidence, method, VarTail::Left).unwrap();
            let cvar = conditional_value_at_risk(&returns, confidence, method, VarTail::Left).unwrap();
            match (var.as_series(), cvar.as_series()) {
                (Some(vars), Some(cvars)) => {
                    assert!(cvars.iter().zip(vars).all(|(c, v)| c <= v));
                }
                _ => assert!(cvar.as_scalar().unwrap() <= var.as_scalar().unwrap()),
            }
        }
    }
}

#[test]
fn test_correlations_symmetric_with_unit_diagonal() {
    let tensor = random_tensor(9, 4, 6, 30);
    let names: Vec<String> = (0..4).map(|i| format!("A{i}")).collect();

    for corr_method in [
        CorrelationMethod::Pooled,
        CorrelationMethod::YearByYear,
        CorrelationMethod::SimulationBySimulation,
    ] {
        let config = MetricsConfig {
            corr_method,
            ..MetricsConfig::default()
        };
        let metrics = asset_metrics(&tensor, &names, &[0.25; 4], &config).unwrap();
        for a in &names {
            assert_eq!(metrics.correlation(a, a), Some(1.0));
            for b in &names {
                let ab = metrics.correlation(a, b).unwrap();
                assert_eq!(Some(ab), metrics.correlation(b, a));
                assert!((-1.0..=1.0).contains(&ab));
            }
        }
    }
}

#[test]
fn test_median_aggregation_is_finite() {
    let tensor = random_tensor(12, 2, 5, 60);
    let returns = build_returns(&[0.7, 0.3], &tensor, Rebalance::Periodic).unwrap();
    let value = crate::stats::annualised_volatility(&returns, 1.0, Aggregation::Median).unwrap();
    assert!(value.is_finite() && value > 0.0);
}
