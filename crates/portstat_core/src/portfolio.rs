//! Portfolio return construction.
//!
//! Combines a weight vector with the asset tensor into a `(period × simulation)`
//! matrix of portfolio returns under a rebalancing policy.
//!
//! # Buy-and-hold approximation
//!
//! Under [`Rebalance::None`] the drifted weights are *not* tracked per path.
//! After each period every path's drifted weights are computed from the
//! original weights and each asset's cumulative growth, then averaged across
//! simulations into one shared weight vector for the next period. A fully
//! per-path drift model would be more rigorous; this collapsed trajectory keeps
//! the computation to one weight vector per period.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::model::{Rebalance, ReturnMatrix, ReturnTensor};
use crate::stats::drawdown::path_max_drawdown;
use crate::stats::{ensure_non_empty, ensure_periods_per_year, sample_std};

/// Build portfolio returns `P[t, s]` from weights and the asset tensor.
///
/// `weights` must have one entry per asset in `tensor`.
pub fn build_returns(
    weights: &[f64],
    tensor: &ReturnTensor,
    rebalance: Rebalance,
) -> Result<ReturnMatrix> {
    if weights.len() != tensor.n_assets() {
        return Err(StatsError::DimensionMismatch {
            expected: tensor.n_assets(),
            actual: weights.len(),
        });
    }

    let returns = match rebalance {
        Rebalance::Periodic => periodic_returns(weights, tensor),
        Rebalance::None => buy_and_hold_returns(weights, tensor),
    };
    Ok(returns)
}

/// Weighted sum over assets for one period, written into `row`.
fn weighted_period(weights: &[f64], tensor: &ReturnTensor, period: usize, row: &mut [f64]) {
    row.fill(0.0);
    for (asset, &w) in weights.iter().enumerate() {
        if w == 0.0 {
            continue;
        }
        for (out, r) in row.iter_mut().zip(tensor.period(asset, period)) {
            *out += w * r;
        }
    }
}

fn periodic_returns(weights: &[f64], tensor: &ReturnTensor) -> ReturnMatrix {
    let (_, n_periods, n_sims) = tensor.shape();
    let mut out = ReturnMatrix::zeros(n_periods, n_sims);

    #[cfg(feature = "parallel")]
    out.as_mut_slice()
        .par_chunks_mut(n_sims)
        .enumerate()
        .for_each(|(t, row)| weighted_period(weights, tensor, t, row));

    #[cfg(not(feature = "parallel"))]
    for t in 0..n_periods {
        weighted_period(weights, tensor, t, out.row_mut(t));
    }

    out
}

fn buy_and_hold_returns(weights: &[f64], tensor: &ReturnTensor) -> ReturnMatrix {
    let (n_assets, n_periods, n_sims) = tensor.shape();
    let mut out = ReturnMatrix::zeros(n_periods, n_sims);

    let mut current = weights.to_vec();
    // growth[a * S + s] = prod_{u <= t} (1 + R[a, u, s])
    let mut growth = vec![1.0; n_assets * n_sims];
    let mut totals = vec![0.0; n_sims];

    for t in 0..n_periods {
        weighted_period(&current, tensor, t, out.row_mut(t));

        if t + 1 >= n_periods {
            break;
        }

        for asset in 0..n_assets {
            let asset_growth = &mut growth[asset * n_sims..(asset + 1) * n_sims];
            for (g, r) in asset_growth.iter_mut().zip(tensor.period(asset, t)) {
                *g *= 1.0 + r;
            }
        }

        totals.fill(0.0);
        for (asset, &w) in weights.iter().enumerate() {
            let asset_growth = &growth[asset * n_sims..(asset + 1) * n_sims];
            for (total, g) in totals.iter_mut().zip(asset_growth) {
                *total += w * g;
            }
        }
        for total in &mut totals {
            if *total == 0.0 {
                *total = 1.0;
            }
        }

        for (asset, &w) in weights.iter().enumerate() {
            let asset_growth = &growth[asset * n_sims..(asset + 1) * n_sims];
            let drifted: f64 = asset_growth
                .iter()
                .zip(&totals)
                .map(|(g, total)| w * g / total)
                .sum();
            current[asset] = drifted / n_sims as f64;
        }

        let sum: f64 = current.iter().sum();
        if sum > 0.0 {
            for w in &mut current {
                *w /= sum;
            }
        }
    }

    out
}

/// Cumulative growth of one unit: `C[t, s] = prod_{u <= t} (1 + P[u, s])`.
#[must_use]
pub fn cumulative_returns(returns: &ReturnMatrix) -> ReturnMatrix {
    let (n_periods, n_sims) = returns.shape();
    let mut out = ReturnMatrix::zeros(n_periods, n_sims);
    let mut level = vec![1.0; n_sims];
    for t in 0..n_periods {
        for (l, r) in level.iter_mut().zip(returns.row(t)) {
            *l *= 1.0 + r;
        }
        out.row_mut(t).copy_from_slice(&level);
    }
    out
}

/// Per-simulation summary of portfolio paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    /// Arithmetic mean period return times `periods_per_year`
    pub annualised_mean: Vec<f64>,
    /// Sample standard deviation times `sqrt(periods_per_year)`
    pub annualised_volatility: Vec<f64>,
    /// Compounded return over the whole horizon
    pub total_return: Vec<f64>,
    /// Worst peak-to-trough decline, positive magnitude
    pub max_drawdown: Vec<f64>,
}

/// Summarize every simulation path of `returns`.
pub fn summarize_paths(returns: &ReturnMatrix, periods_per_year: f64) -> Result<PathSummary> {
    ensure_non_empty(returns)?;
    ensure_periods_per_year(periods_per_year)?;

    let n_sims = returns.n_simulations();
    let cumulative = cumulative_returns(returns);
    let last = cumulative.row(returns.n_periods() - 1);

    let mut summary = PathSummary {
        annualised_mean: Vec::with_capacity(n_sims),
        annualised_volatility: Vec::with_capacity(n_sims),
        total_return: Vec::with_capacity(n_sims),
        max_drawdown: Vec::with_capacity(n_sims),
    };
    for s in 0..n_sims {
        let path = returns.column(s);
        let mean = path.iter().sum::<f64>() / path.len() as f64;
        summary.annualised_mean.push(mean * periods_per_year);
        summary
            .annualised_volatility
            .push(sample_std(&path) * periods_per_year.sqrt());
        summary.total_return.push(last[s] - 1.0);
        summary.max_drawdown.push(path_max_drawdown(&path));
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_asset_tensor() -> ReturnTensor {
        ReturnTensor::from_nested(&[
            vec![vec![0.1, 0.2], vec![0.05, -0.1]],
            vec![vec![0.15, 0.25], vec![0.08, -0.05]],
        ])
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_periodic_weighted_sum() {
        let returns = build_returns(&[0.6, 0.4], &two_asset_tensor(), Rebalance::Periodic).unwrap();
        let expected = [[0.12, 0.22], [0.062, -0.08]];
        for (t, row) in expected.iter().enumerate() {
            for (s, value) in row.iter().enumerate() {
                assert_close(returns.get(t, s), *value);
            }
        }
    }

    #[test]
    fn test_weight_length_mismatch() {
        let result = build_returns(&[0.5, 0.3, 0.2], &two_asset_tensor(), Rebalance::Periodic);
        assert_eq!(
            result,
            Err(StatsError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_buy_and_hold_drifts_toward_winner() {
        let tensor = two_asset_tensor();
        let returns = build_returns(&[0.6, 0.4], &tensor, Rebalance::None).unwrap();

        // First period uses the initial weights.
        assert_close(returns.get(0, 0), 0.12);
        assert_close(returns.get(0, 1), 0.22);

        // Path 0: growth (1.10, 1.15) -> drifted (0.66/1.12, 0.46/1.12)
        // Path 1: growth (1.20, 1.25) -> drifted (0.72/1.22, 0.50/1.22)
        let w0 = (0.66 / 1.12 + 0.72 / 1.22) / 2.0;
        let w1 = (0.46 / 1.12 + 0.50 / 1.22) / 2.0;
        assert_close(w0 + w1, 1.0);
        assert_close(returns.get(1, 0), w0 * 0.05 + w1 * 0.08);
        assert_close(returns.get(1, 1), w0 * -0.1 + w1 * -0.05);
        assert!(w1 > 0.4);
    }

    #[test]
    fn test_buy_and_hold_single_period_matches_periodic() {
        let tensor = ReturnTensor::from_nested(&[vec![vec![0.1, -0.2]], vec![vec![0.3, 0.0]]]).unwrap();
        let periodic = build_returns(&[0.5, 0.5], &tensor, Rebalance::Periodic).unwrap();
        let held = build_returns(&[0.5, 0.5], &tensor, Rebalance::None).unwrap();
        assert_eq!(periodic, held);
    }

    #[test]
    fn test_buy_and_hold_zero_total_path() {
        // Asset 0 is wiped out on path 0 while asset 1 carries zero weight.
        let tensor = ReturnTensor::from_nested(&[
            vec![vec![-1.0, 0.1], vec![0.05, 0.05]],
            vec![vec![0.2, 0.2], vec![0.1, 0.1]],
        ])
        .unwrap();
        let returns = build_returns(&[1.0, 0.0], &tensor, Rebalance::None).unwrap();
        assert!(returns.as_slice().iter().all(|v| v.is_finite()));
        assert_close(returns.get(1, 0), 0.05);
    }

    #[test]
    fn test_cumulative_returns() {
        let returns = ReturnMatrix::from_rows(&[vec![0.1, 0.2], vec![0.05, -0.1]]).unwrap();
        let cumulative = cumulative_returns(&returns);
        assert_close(cumulative.get(0, 0), 1.1);
        assert_close(cumulative.get(1, 0), 1.155);
        assert_close(cumulative.get(1, 1), 1.08);
    }

    #[test]
    fn test_summarize_paths() {
        let returns =
            ReturnMatrix::from_rows(&[vec![0.1, 0.2], vec![0.05, -0.1], vec![0.08, 0.15]]).unwrap();
        let summary = summarize_paths(&returns, 1.0).unwrap();

        assert_close(summary.annualised_mean[0], 0.23 / 3.0);
        assert_close(summary.total_return[0], 1.1 * 1.05 * 1.08 - 1.0);
        assert_close(summary.max_drawdown[0], 0.0);
        assert_close(summary.max_drawdown[1], 0.1);
        assert!(summary.annualised_volatility.iter().all(|v| *v > 0.0));
    }
}
