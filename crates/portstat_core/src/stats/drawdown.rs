//! Peak-to-trough drawdown.
//!
//! Drawdowns are reported as positive magnitudes: a path that falls from a
//! peak of 1.2 to 0.9 has a drawdown of 0.25. A path whose cumulative value
//! never decreases has a maximum drawdown of exactly zero.

use super::{aggregate, ensure_non_empty, per_simulation};
use crate::error::Result;
use crate::model::{Aggregation, ReturnMatrix};

/// Worst drawdown of one path of period returns.
///
/// Tracks `C[t] = prod_{u <= t} (1 + r[u])` and its running peak `M[t]`,
/// returning `max_t (1 - C[t] / M[t])`.
#[must_use]
pub fn path_max_drawdown(path: &[f64]) -> f64 {
    let mut level = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;

    for r in path {
        level *= 1.0 + r;
        if level > peak {
            peak = level;
        }
        if peak > 0.0 {
            worst = worst.max(1.0 - level / peak);
        }
    }

    worst
}

/// Maximum drawdown of every simulation path.
pub fn drawdown_per_simulation(returns: &ReturnMatrix) -> Result<Vec<f64>> {
    ensure_non_empty(returns)?;
    Ok(per_simulation(returns, path_max_drawdown))
}

/// Maximum drawdown aggregated across simulations (positive magnitude).
pub fn maximum_drawdown(returns: &ReturnMatrix, aggregation: Aggregation) -> Result<f64> {
    let drawdowns = drawdown_per_simulation(returns)?;
    Ok(aggregate(&drawdowns, aggregation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_path_has_no_drawdown() {
        assert_eq!(path_max_drawdown(&[0.1, 0.0, 0.05, 0.2]), 0.0);
    }

    #[test]
    fn test_peak_to_trough() {
        // 1.2 -> 0.96 -> 1.056: worst decline 0.2 from the 1.2 peak
        let dd = path_max_drawdown(&[0.2, -0.2, 0.1]);
        assert!((dd - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_first_period_sets_initial_peak() {
        // The running peak starts at the first cumulative value.
        assert_eq!(path_max_drawdown(&[-0.5]), 0.0);
        let dd = path_max_drawdown(&[-0.5, -0.5]);
        assert!((dd - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_aggregated_drawdown() {
        let returns =
            ReturnMatrix::from_rows(&[vec![0.1, 0.2], vec![-0.1, 0.1], vec![0.05, -0.5]]).unwrap();
        let mean = maximum_drawdown(&returns, Aggregation::Mean).unwrap();
        assert!((mean - (0.1 + 0.5) / 2.0).abs() < 1e-12);
        assert!(mean >= 0.0);
    }
}
