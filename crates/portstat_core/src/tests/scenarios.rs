//! Worked scenarios with hand-computed expected values
//!
//! These tests verify that:
//! - Periodic rebalancing applies fixed weights every period
//! - Pooled VaR interpolates between order statistics and CVaR averages the tail
//! - Zero-volatility paths give a signed infinite Sharpe ratio, never an error
//! - An unknown category selects nothing and fails before any computation

use crate::error::StatsError;
use crate::evaluate::evaluate;
use crate::model::{Aggregation, Rebalance, ReturnMatrix, VarMethod, VarTail};
use crate::portfolio::build_returns;
use crate::request::{Statistic, StatisticRequest};
use crate::stats::{
    conditional_value_at_risk, maximum_drawdown, sharpe_ratio, value_at_risk,
};

use super::{sample_store, two_asset_tensor};

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_periodic_portfolio_returns() {
    let returns = build_returns(&[0.6, 0.4], &two_asset_tensor(), Rebalance::Periodic).unwrap();
    let expected = [[0.12, 0.22], [0.062, -0.08]];

    assert_eq!(returns.shape(), (2, 2));
    for (t, row) in expected.iter().enumerate() {
        for (s, value) in row.iter().enumerate() {
            assert_close(returns.get(t, s), *value, 1e-12);
        }
    }
}

#[test]
fn test_pooled_tail_risk() {
    let returns =
        ReturnMatrix::from_rows(&[vec![0.1, 0.2], vec![0.05, -0.1], vec![-0.05, 0.0]]).unwrap();

    let var = value_at_risk(&returns, 0.95, VarMethod::Pooled, VarTail::Left).unwrap();
    let cvar = conditional_value_at_risk(&returns, 0.95, VarMethod::Pooled, VarTail::Left).unwrap();

    assert_close(var.as_scalar().unwrap(), -0.0875, 1e-9);
    assert_close(cvar.as_scalar().unwrap(), -0.1, 1e-12);
}

#[test]
fn test_zero_volatility_sharpe_is_infinite() {
    let returns = ReturnMatrix::from_rows(&[vec![0.1, 0.1], vec![0.1, 0.1]]).unwrap();
    let sharpe = sharpe_ratio(&returns, 0.02, 1.0, Aggregation::Mean).unwrap();
    assert_eq!(sharpe, f64::INFINITY);
}

#[test]
fn test_flat_paths_have_zero_drawdown() {
    let returns = ReturnMatrix::from_rows(&[vec![0.1, 0.0], vec![0.0, 0.0], vec![0.2, 0.3]]).unwrap();
    assert_eq!(maximum_drawdown(&returns, Aggregation::Mean).unwrap(), 0.0);
}

#[test]
fn test_unknown_category_selects_nothing() {
    let store = sample_store();
    let request = StatisticRequest {
        weights: Some(vec![0.5, 0.3, 0.2]),
        include_categories: Some(vec!["NonExistentCategory".into()]),
        ..StatisticRequest::default()
    };

    for statistic in [Statistic::AnnualisedReturn, Statistic::ValueAtRisk] {
        assert_eq!(
            evaluate(&store, statistic, &request),
            Err(StatsError::NoMatchingAssets)
        );
    }
}
