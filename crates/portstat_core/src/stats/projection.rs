//! Percentile table of projected portfolio value over time.

use serde::{Deserialize, Serialize};

use super::{ensure_non_empty, mean, quantile_sorted};
use crate::error::{Result, StatsError};
use crate::model::ReturnMatrix;
use crate::portfolio::cumulative_returns;

/// Default percentile levels of the projection table
pub const DEFAULT_PERCENTILES: [f64; 5] = [0.05, 0.25, 0.50, 0.75, 0.95];

/// Distribution of portfolio value at the end of one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// 1-based period index
    pub period: usize,
    pub mean: f64,
    /// `(level, value)` pairs in the order the levels were requested
    pub percentiles: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueProjection {
    pub rows: Vec<ProjectionRow>,
}

impl ValueProjection {
    /// Row for the final period
    #[must_use]
    pub fn terminal(&self) -> Option<&ProjectionRow> {
        self.rows.last()
    }
}

/// Project `initial_value` through every simulation path and summarize each
/// period across simulations.
pub fn value_projection(
    returns: &ReturnMatrix,
    initial_value: f64,
    percentiles: &[f64],
) -> Result<ValueProjection> {
    ensure_non_empty(returns)?;
    if !initial_value.is_finite() {
        return Err(StatsError::parameter(
            "initial_value",
            format!("must be finite, got {initial_value}"),
        ));
    }
    if let Some(bad) = percentiles.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(StatsError::parameter(
            "percentiles",
            format!("each level must lie in [0, 1], got {bad}"),
        ));
    }

    let cumulative = cumulative_returns(returns);
    let rows = (0..cumulative.n_periods())
        .map(|t| {
            let mut values: Vec<f64> = cumulative
                .row(t)
                .iter()
                .map(|growth| initial_value * growth)
                .collect();
            let mean = mean(&values);
            values.sort_by(f64::total_cmp);
            ProjectionRow {
                period: t + 1,
                mean,
                percentiles: percentiles
                    .iter()
                    .map(|p| (*p, quantile_sorted(&values, *p)))
                    .collect(),
            }
        })
        .collect();

    Ok(ValueProjection { rows })
}
