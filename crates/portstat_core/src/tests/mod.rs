//! Integration tests for the portfolio analytics core
//!
//! Tests are organized by topic:
//! - `scenarios` - Worked examples with known expected values
//! - `evaluate` - Request evaluation against a populated store
//! - `asset_metrics` - Per-asset metrics and correlation aggregation
//! - `properties` - Invariants checked over randomly generated tensors

mod properties;
mod scenarios;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};

use crate::model::{AssetUniverse, ReturnTensor};
use crate::store::TensorStore;

/// Two-asset tensor with two periods and two simulations
pub(crate) fn two_asset_tensor() -> ReturnTensor {
    ReturnTensor::from_nested(&[
        vec![vec![0.1, 0.2], vec![0.05, -0.1]],
        vec![vec![0.15, 0.25], vec![0.08, -0.05]],
    ])
    .unwrap()
}

/// Store with three assets: two equities and one bond
pub(crate) fn sample_store() -> TensorStore {
    let tensor = ReturnTensor::from_nested(&[
        vec![vec![0.1, 0.2, -0.05], vec![0.05, -0.1, 0.12], vec![0.07, 0.03, -0.2]],
        vec![vec![0.15, 0.25, -0.1], vec![0.08, -0.05, 0.1], vec![0.02, 0.06, -0.15]],
        vec![vec![0.03, 0.02, 0.04], vec![0.01, 0.05, 0.02], vec![0.03, 0.01, 0.02]],
    ])
    .unwrap();
    let universe = AssetUniverse::new(
        tensor,
        vec!["US Equity".into(), "Intl Equity".into(), "Treasuries".into()],
        vec!["Equity".into(), "Equity".into(), "Bond".into()],
    )
    .unwrap();
    TensorStore::with_universe(universe)
}

/// Normally distributed returns with a fixed seed
pub(crate) fn random_tensor(
    seed: u64,
    n_assets: usize,
    n_periods: usize,
    n_simulations: usize,
) -> ReturnTensor {
    let mut rng = SmallRng::seed_from_u64(seed);
    let normal = Normal::new(0.06_f64, 0.15).unwrap();
    let data = (0..n_assets * n_periods * n_simulations)
        .map(|_| normal.sample(&mut rng).max(-0.95))
        .collect();
    ReturnTensor::from_data(n_assets, n_periods, n_simulations, data).unwrap()
}
