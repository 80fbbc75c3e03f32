//! Risk-adjusted return ratios.
//!
//! Each ratio is formed per simulation path and the per-path ratios are then
//! aggregated, so skewed path distributions are reflected in the result. A
//! zero denominator on a path resolves through [`ratio_or_limit`]; with mean
//! aggregation a mix of `+inf` and `-inf` paths yields NaN.

use super::drawdown::drawdown_per_simulation;
use super::returns::{
    cagr_per_simulation, downside_per_simulation, tracking_error_per_simulation,
    volatility_per_simulation,
};
use super::{aggregate, ensure_same_shape, ratio_or_limit};
use crate::error::Result;
use crate::model::{Aggregation, ReturnMatrix};

fn per_path_ratio(numerators: &[f64], denominators: &[f64], aggregation: Aggregation) -> f64 {
    let ratios: Vec<f64> = numerators
        .iter()
        .zip(denominators)
        .map(|(n, d)| ratio_or_limit(*n, *d))
        .collect();
    aggregate(&ratios, aggregation)
}

fn excess_cagr(returns: &ReturnMatrix, risk_free_rate: f64, periods_per_year: f64) -> Result<Vec<f64>> {
    Ok(cagr_per_simulation(returns, periods_per_year)?
        .into_iter()
        .map(|cagr| cagr - risk_free_rate)
        .collect())
}

/// `(CAGR - risk_free_rate) / annualized volatility`, per path then aggregated.
pub fn sharpe_ratio(
    returns: &ReturnMatrix,
    risk_free_rate: f64,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let excess = excess_cagr(returns, risk_free_rate, periods_per_year)?;
    let vol = volatility_per_simulation(returns, periods_per_year)?;
    Ok(per_path_ratio(&excess, &vol, aggregation))
}

/// `(CAGR - risk_free_rate) / downside deviation`, per path then aggregated.
pub fn sortino_ratio(
    returns: &ReturnMatrix,
    risk_free_rate: f64,
    minimum_acceptable_return: f64,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let excess = excess_cagr(returns, risk_free_rate, periods_per_year)?;
    let downside = downside_per_simulation(returns, minimum_acceptable_return, periods_per_year)?;
    Ok(per_path_ratio(&excess, &downside, aggregation))
}

/// `(portfolio CAGR - benchmark CAGR) / tracking error`, per path then aggregated.
pub fn information_ratio(
    portfolio: &ReturnMatrix,
    benchmark: &ReturnMatrix,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    ensure_same_shape(portfolio, benchmark)?;
    let portfolio_cagr = cagr_per_simulation(portfolio, periods_per_year)?;
    let benchmark_cagr = cagr_per_simulation(benchmark, periods_per_year)?;
    let excess: Vec<f64> = portfolio_cagr
        .iter()
        .zip(&benchmark_cagr)
        .map(|(p, b)| p - b)
        .collect();
    let te = tracking_error_per_simulation(portfolio, benchmark, periods_per_year)?;
    Ok(per_path_ratio(&excess, &te, aggregation))
}

/// `(CAGR - risk_free_rate) / maximum drawdown`, per path then aggregated.
///
/// Drawdowns are already positive magnitudes.
pub fn calmar_ratio(
    returns: &ReturnMatrix,
    risk_free_rate: f64,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let excess = excess_cagr(returns, risk_free_rate, periods_per_year)?;
    let drawdowns = drawdown_per_simulation(returns)?;
    Ok(per_path_ratio(&excess, &drawdowns, aggregation))
}
