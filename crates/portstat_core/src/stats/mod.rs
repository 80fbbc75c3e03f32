//! Risk and return statistics over portfolio return matrices.
//!
//! Every statistic works on a `(period × simulation)` [`ReturnMatrix`]. Path
//! statistics are evaluated independently for each simulation and then
//! collapsed with an [`Aggregation`]; quantile statistics pick their sample
//! with a [`VarMethod`](crate::model::VarMethod).
//!
//! Conventions shared by the whole engine:
//! - maximum drawdown is a positive magnitude (`1 - C/M`, never negative);
//! - ratios (Sharpe, Sortino, Calmar, information) are computed per simulation
//!   before aggregation, with a zero denominator resolving to `0.0` when the
//!   numerator is also zero and to a signed infinity otherwise.

pub mod drawdown;
pub mod projection;
pub mod ratios;
pub mod returns;
pub mod tail;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, StatsError};
use crate::model::{Aggregation, ReturnMatrix};

pub use drawdown::{drawdown_per_simulation, maximum_drawdown, path_max_drawdown};
pub use projection::{DEFAULT_PERCENTILES, ProjectionRow, ValueProjection, value_projection};
pub use ratios::{calmar_ratio, information_ratio, sharpe_ratio, sortino_ratio};
pub use returns::{
    annualised_return, annualised_volatility, cagr_per_simulation, downside_deviation,
    tracking_error, volatility_per_simulation,
};
pub use tail::{TailRisk, conditional_value_at_risk, value_at_risk};

/// Arithmetic mean; NaN for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with the usual midpoint rule for even lengths.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.5)
}

/// Every value equals the first. The mean of such a series can carry rounding
/// residue, so dispersion is reported as exactly zero instead.
fn is_constant(values: &[f64]) -> bool {
    values.split_first().is_some_and(|(first, rest)| rest.iter().all(|v| v == first))
}

/// Bessel-corrected (ddof = 1) standard deviation; NaN below two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    if is_constant(values) {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Population (ddof = 0) standard deviation.
#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    if is_constant(values) {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

/// Linear-interpolation quantile of an ascending slice.
///
/// Interpolates between the order statistics around `q * (n - 1)`.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let (a, b) = (sorted[lo], sorted[hi]);
            // Equal neighbours short-circuit so infinite samples do not turn into NaN
            if a == b { a } else { a + (b - a) * (pos - lo as f64) }
        }
    }
}

/// Collapse a per-simulation distribution to one value.
#[must_use]
pub fn aggregate(values: &[f64], aggregation: Aggregation) -> f64 {
    match aggregation {
        Aggregation::Mean => mean(values),
        Aggregation::Median => median(values),
    }
}

/// `numerator / denominator`, with a zero denominator giving `0.0` for a zero
/// numerator and a signed infinity otherwise.
#[must_use]
pub fn ratio_or_limit(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        if numerator == 0.0 {
            0.0
        } else {
            f64::INFINITY.copysign(numerator)
        }
    } else {
        numerator / denominator
    }
}

/// Apply `f` to every simulation path (one column of the matrix).
pub(crate) fn per_simulation<F>(returns: &ReturnMatrix, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64 + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..returns.n_simulations())
            .into_par_iter()
            .map(|s| f(&returns.column(s)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..returns.n_simulations())
            .map(|s| f(&returns.column(s)))
            .collect()
    }
}

pub(crate) fn ensure_non_empty(returns: &ReturnMatrix) -> Result<()> {
    if returns.is_empty() {
        return Err(StatsError::parameter(
            "returns",
            "matrix must have at least one period and one simulation",
        ));
    }
    Ok(())
}

pub(crate) fn ensure_same_shape(portfolio: &ReturnMatrix, benchmark: &ReturnMatrix) -> Result<()> {
    if portfolio.shape() != benchmark.shape() {
        return Err(StatsError::ShapeMismatch {
            left: portfolio.shape(),
            right: benchmark.shape(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_periods_per_year(periods_per_year: f64) -> Result<()> {
    if !(periods_per_year.is_finite() && periods_per_year > 0.0) {
        return Err(StatsError::parameter(
            "periods_per_year",
            format!("must be positive and finite, got {periods_per_year}"),
        ));
    }
    Ok(())
}
