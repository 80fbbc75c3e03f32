//! Value-at-Risk and Conditional Value-at-Risk.
//!
//! Both are reported in return units (a loss is negative). With the default
//! left tail, VaR is the `1 - confidence` quantile and CVaR the mean of the
//! sample at or below it, so `CVaR <= VaR`. The right tail mirrors this on
//! the gain side (`confidence` quantile, mean at or above it, `CVaR >= VaR`).

use serde::{Deserialize, Serialize};

use super::{ensure_non_empty, mean, quantile_sorted};
use crate::error::{Result, StatsError};
use crate::model::{ReturnMatrix, VarMethod, VarTail};

/// Result of a quantile statistic: one value, or one value per period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TailRisk {
    Scalar(f64),
    PerPeriod(Vec<f64>),
}

impl TailRisk {
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::PerPeriod(_) => None,
        }
    }

    #[must_use]
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Self::Scalar(_) => None,
            Self::PerPeriod(values) => Some(values),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TailEstimate {
    var: f64,
    cvar: f64,
}

fn validate_confidence(confidence: f64) -> Result<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(StatsError::InvalidConfidence(confidence));
    }
    Ok(())
}

/// VaR and CVaR of one sample. The sample is sorted in place.
fn estimate(sample: &mut [f64], confidence: f64, tail: VarTail) -> TailEstimate {
    sample.sort_by(f64::total_cmp);

    match tail {
        VarTail::Left => {
            let var = quantile_sorted(sample, 1.0 - confidence);
            let cutoff = sample.partition_point(|v| *v <= var);
            let cvar = if cutoff == 0 {
                var
            } else {
                mean(&sample[..cutoff])
            };
            TailEstimate { var, cvar }
        }
        VarTail::Right => {
            let var = quantile_sorted(sample, confidence);
            let cutoff = sample.partition_point(|v| *v < var);
            let cvar = if cutoff == sample.len() {
                var
            } else {
                mean(&sample[cutoff..])
            };
            TailEstimate { var, cvar }
        }
    }
}

fn tail_estimates(
    returns: &ReturnMatrix,
    confidence: f64,
    method: VarMethod,
    tail: VarTail,
) -> Result<Vec<TailEstimate>> {
    validate_confidence(confidence)?;
    ensure_non_empty(returns)?;

    let estimates = match method {
        VarMethod::Pooled => {
            let mut pooled = returns.as_slice().to_vec();
            vec![estimate(&mut pooled, confidence, tail)]
        }
        VarMethod::YearByYear => (0..returns.n_periods())
            .map(|t| {
                let mut period = returns.row(t).to_vec();
                estimate(&mut period, confidence, tail)
            })
            .collect(),
        VarMethod::Cumulative => {
            let mut terminal = vec![1.0; returns.n_simulations()];
            for t in 0..returns.n_periods() {
                for (level, r) in terminal.iter_mut().zip(returns.row(t)) {
                    *level *= 1.0 + r;
                }
            }
            for level in &mut terminal {
                *level -= 1.0;
            }
            vec![estimate(&mut terminal, confidence, tail)]
        }
    };
    Ok(estimates)
}

fn collect(method: VarMethod, values: Vec<f64>) -> TailRisk {
    match method {
        VarMethod::YearByYear => TailRisk::PerPeriod(values),
        VarMethod::Pooled | VarMethod::Cumulative => TailRisk::Scalar(values[0]),
    }
}

/// Value-at-Risk at `confidence` over the distribution chosen by `method`.
///
/// `year_by_year` returns one value per period; the other methods return a
/// scalar.
pub fn value_at_risk(
    returns: &ReturnMatrix,
    confidence: f64,
    method: VarMethod,
    tail: VarTail,
) -> Result<TailRisk> {
    let estimates = tail_estimates(returns, confidence, method, tail)?;
    Ok(collect(method, estimates.iter().map(|e| e.var).collect()))
}

/// Conditional Value-at-Risk (expected shortfall beyond the VaR threshold).
///
/// Falls back to the VaR itself when no observation lies in the tail.
pub fn conditional_value_at_risk(
    returns: &ReturnMatrix,
    confidence: f64,
    method: VarMethod,
    tail: VarTail,
) -> Result<TailRisk> {
    let estimates = tail_estimates(returns, confidence, method, tail)?;
    Ok(collect(method, estimates.iter().map(|e| e.cvar).collect()))
}
