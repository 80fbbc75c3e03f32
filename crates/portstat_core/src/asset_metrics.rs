//! Per-asset annualized metrics and the cross-asset correlation matrix.
//!
//! Assets are analyzed individually straight from the return tensor, so no
//! portfolio matrix is built here. Only assets with a strictly positive weight
//! take part.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::model::{CorrelationMethod, ReturnTensor};
use crate::stats::{ensure_periods_per_year, mean, population_std};

/// Correlations are clipped to this magnitude before the Fisher transform
pub const FISHER_CLIP: f64 = 0.9999;

/// Settings for one asset-metrics run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsConfig {
    pub periods_per_year: f64,
    /// Whether tensor values are already log returns
    pub is_log: bool,
    /// How each asset's observations collapse into the series the metrics use
    pub aggregation: CorrelationMethod,
    pub corr_method: CorrelationMethod,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 1.0,
            is_log: false,
            aggregation: CorrelationMethod::Pooled,
            corr_method: CorrelationMethod::Pooled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetric {
    pub asset: String,
    pub weight: f64,
    pub annualised_return: f64,
    pub annualised_volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub asset1: String,
    pub asset2: String,
    pub correlation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetrics {
    pub per_asset: Vec<AssetMetric>,
    /// Every ordered pair of included assets, self-pairs included
    pub correlation_matrix: Vec<CorrelationEntry>,
}

impl AssetMetrics {
    /// Reported correlation between two included assets
    #[must_use]
    pub fn correlation(&self, asset1: &str, asset2: &str) -> Option<f64> {
        self.correlation_matrix
            .iter()
            .find(|e| e.asset1 == asset1 && e.asset2 == asset2)
            .map(|e| e.correlation)
    }
}

/// Annualized return and volatility per asset plus their correlations.
///
/// Returns are always compounded on the log scale:
/// `exp(mean(log(1 + r)) * periods_per_year) - 1`. Volatility is the
/// population standard deviation of the untransformed series scaled by
/// `sqrt(periods_per_year)`.
pub fn asset_metrics(
    tensor: &ReturnTensor,
    asset_names: &[String],
    weights: &[f64],
    config: &MetricsConfig,
) -> Result<AssetMetrics> {
    let n_assets = tensor.n_assets();
    if weights.len() != n_assets {
        return Err(StatsError::DimensionMismatch {
            expected: n_assets,
            actual: weights.len(),
        });
    }
    if asset_names.len() != n_assets {
        return Err(StatsError::DimensionMismatch {
            expected: n_assets,
            actual: asset_names.len(),
        });
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(StatsError::InvalidWeights(
            "weights must be finite and non-negative".into(),
        ));
    }
    ensure_periods_per_year(config.periods_per_year)?;

    let included: Vec<usize> = (0..n_assets).filter(|a| weights[*a] > 0.0).collect();
    if included.is_empty() {
        return Err(StatsError::NoMatchingAssets);
    }

    let metric_for = |a: &usize| -> AssetMetric {
        let raw = tensor.asset(*a);
        let logs: Vec<f64> = if config.is_log {
            raw.to_vec()
        } else {
            raw.iter().map(|r| r.ln_1p()).collect()
        };
        let log_series = collapse(&logs, tensor, config.aggregation);
        let raw_series = collapse(raw, tensor, config.aggregation);

        AssetMetric {
            asset: asset_names[*a].clone(),
            weight: weights[*a],
            annualised_return: (mean(&log_series) * config.periods_per_year).exp() - 1.0,
            annualised_volatility: population_std(&raw_series) * config.periods_per_year.sqrt(),
        }
    };

    #[cfg(feature = "parallel")]
    let per_asset: Vec<AssetMetric> = included.par_iter().map(metric_for).collect();
    #[cfg(not(feature = "parallel"))]
    let per_asset: Vec<AssetMetric> = included.iter().map(metric_for).collect();

    let matrix = correlation(tensor, &included, config.corr_method);
    let n = included.len();
    let mut correlation_matrix = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let value = matrix[i * n + j];
            correlation_matrix.push(CorrelationEntry {
                asset1: asset_names[included[i]].clone(),
                asset2: asset_names[included[j]].clone(),
                correlation: if value.is_finite() { value } else { 0.0 },
            });
        }
    }

    tracing::debug!(
        n_included = n,
        aggregation = config.aggregation.as_str(),
        corr_method = config.corr_method.as_str(),
        "Computed asset metrics"
    );

    Ok(AssetMetrics {
        per_asset,
        correlation_matrix,
    })
}

/// Collapse one asset's `T × S` observations (period-major) into its series.
fn collapse(values: &[f64], tensor: &ReturnTensor, mode: CorrelationMethod) -> Vec<f64> {
    let (_, n_periods, n_sims) = tensor.shape();
    match mode {
        CorrelationMethod::Pooled => values.to_vec(),
        CorrelationMethod::YearByYear => values.chunks(n_sims).map(mean).collect(),
        CorrelationMethod::SimulationBySimulation => (0..n_sims)
            .map(|s| (0..n_periods).map(|t| values[t * n_sims + s]).sum::<f64>() / n_periods as f64)
            .collect(),
    }
}

/// Correlation matrix of the included assets, row-major `n × n`, diagonal 1.
fn correlation(tensor: &ReturnTensor, included: &[usize], method: CorrelationMethod) -> Vec<f64> {
    let (_, n_periods, n_sims) = tensor.shape();
    let mut matrix = match method {
        CorrelationMethod::Pooled => {
            let series: Vec<&[f64]> = included.iter().map(|a| tensor.asset(*a)).collect();
            pearson_matrix(&series)
        }
        CorrelationMethod::YearByYear => fisher_average(n_periods, included.len(), |t| {
            let series: Vec<&[f64]> = included.iter().map(|a| tensor.period(*a, t)).collect();
            pearson_matrix(&series)
        }),
        CorrelationMethod::SimulationBySimulation => fisher_average(n_sims, included.len(), |s| {
            let paths: Vec<Vec<f64>> = included
                .iter()
                .map(|a| (0..n_periods).map(|t| tensor.get(*a, t, s)).collect())
                .collect();
            let series: Vec<&[f64]> = paths.iter().map(Vec::as_slice).collect();
            pearson_matrix(&series)
        }),
    };

    let n = included.len();
    for i in 0..n {
        matrix[i * n + i] = 1.0;
    }
    matrix
}

/// Pearson correlation of every pair of equal-length series.
///
/// A constant series has no defined correlation and yields NaN off the
/// diagonal.
pub(crate) fn pearson_matrix(series: &[&[f64]]) -> Vec<f64> {
    let n = series.len();
    let centered: Vec<Vec<f64>> = series
        .iter()
        .map(|s| {
            let m = mean(s);
            s.iter().map(|v| v - m).collect()
        })
        .collect();
    let norms: Vec<f64> = centered
        .iter()
        .map(|c| c.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();

    let mut matrix = vec![1.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let dot: f64 = centered[i].iter().zip(&centered[j]).map(|(x, y)| x * y).sum();
            let r = (dot / (norms[i] * norms[j])).clamp(-1.0, 1.0);
            matrix[i * n + j] = r;
            matrix[j * n + i] = r;
        }
    }
    matrix
}

/// Fisher-z average of `count` correlation matrices of size `n × n`.
///
/// Each entry is clipped to `±FISHER_CLIP`, mapped through `atanh`, averaged
/// element-wise and mapped back with `tanh`. NaN entries propagate.
pub(crate) fn fisher_average<F>(count: usize, n: usize, matrix_at: F) -> Vec<f64>
where
    F: Fn(usize) -> Vec<f64> + Sync + Send,
{
    let to_z = |k: usize| -> Vec<f64> {
        matrix_at(k)
            .into_iter()
            .map(|r| r.clamp(-FISHER_CLIP, FISHER_CLIP).atanh())
            .collect()
    };
    let add = |mut acc: Vec<f64>, z: Vec<f64>| {
        for (a, b) in acc.iter_mut().zip(z) {
            *a += b;
        }
        acc
    };

    #[cfg(feature = "parallel")]
    let total = (0..count)
        .into_par_iter()
        .map(to_z)
        .reduce(|| vec![0.0; n * n], add);
    #[cfg(not(feature = "parallel"))]
    let total = (0..count).map(to_z).fold(vec![0.0; n * n], add);

    total
        .into_iter()
        .map(|z| (z / count as f64).tanh())
        .collect()
}
