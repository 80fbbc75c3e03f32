//! Growth and dispersion statistics.

use super::{
    aggregate, ensure_non_empty, ensure_periods_per_year, ensure_same_shape, mean,
    per_simulation, sample_std,
};
use crate::error::Result;
use crate::model::{Aggregation, ReturnMatrix};

/// Compound annual growth rate of each simulation path.
///
/// `(prod_t (1 + P[t, s]))^(periods_per_year / T) - 1`
pub fn cagr_per_simulation(returns: &ReturnMatrix, periods_per_year: f64) -> Result<Vec<f64>> {
    ensure_non_empty(returns)?;
    ensure_periods_per_year(periods_per_year)?;

    let years = returns.n_periods() as f64 / periods_per_year;
    Ok(per_simulation(returns, |path| {
        let growth: f64 = path.iter().map(|r| 1.0 + r).product();
        growth.powf(1.0 / years) - 1.0
    }))
}

/// Annualized sample volatility of each simulation path.
pub fn volatility_per_simulation(
    returns: &ReturnMatrix,
    periods_per_year: f64,
) -> Result<Vec<f64>> {
    ensure_non_empty(returns)?;
    ensure_periods_per_year(periods_per_year)?;

    let scale = periods_per_year.sqrt();
    Ok(per_simulation(returns, |path| sample_std(path) * scale))
}

pub(crate) fn downside_per_simulation(
    returns: &ReturnMatrix,
    minimum_acceptable_return: f64,
    periods_per_year: f64,
) -> Result<Vec<f64>> {
    ensure_non_empty(returns)?;
    ensure_periods_per_year(periods_per_year)?;

    let scale = periods_per_year.sqrt();
    Ok(per_simulation(returns, |path| {
        let shortfall: Vec<f64> = path
            .iter()
            .map(|r| (r - minimum_acceptable_return).min(0.0).powi(2))
            .collect();
        mean(&shortfall).sqrt() * scale
    }))
}

pub(crate) fn tracking_error_per_simulation(
    portfolio: &ReturnMatrix,
    benchmark: &ReturnMatrix,
    periods_per_year: f64,
) -> Result<Vec<f64>> {
    ensure_same_shape(portfolio, benchmark)?;
    ensure_non_empty(portfolio)?;
    ensure_periods_per_year(periods_per_year)?;

    let scale = periods_per_year.sqrt();
    let n_periods = portfolio.n_periods();
    let excess: Vec<f64> = portfolio
        .as_slice()
        .iter()
        .zip(benchmark.as_slice())
        .map(|(p, b)| p - b)
        .collect();
    let excess = ReturnMatrix::from_data(n_periods, portfolio.n_simulations(), excess)?;

    Ok(per_simulation(&excess, |path| sample_std(path) * scale))
}

/// Compound annual growth rate, aggregated across simulations.
pub fn annualised_return(
    returns: &ReturnMatrix,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let cagr = cagr_per_simulation(returns, periods_per_year)?;
    Ok(aggregate(&cagr, aggregation))
}

/// Annualized volatility (ddof = 1 across time), aggregated across simulations.
pub fn annualised_volatility(
    returns: &ReturnMatrix,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let vol = volatility_per_simulation(returns, periods_per_year)?;
    Ok(aggregate(&vol, aggregation))
}

/// Annualized standard deviation of `portfolio - benchmark`.
///
/// Both matrices must have the same shape.
pub fn tracking_error(
    portfolio: &ReturnMatrix,
    benchmark: &ReturnMatrix,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let te = tracking_error_per_simulation(portfolio, benchmark, periods_per_year)?;
    Ok(aggregate(&te, aggregation))
}

/// Root mean square shortfall below `minimum_acceptable_return`, annualized.
pub fn downside_deviation(
    returns: &ReturnMatrix,
    minimum_acceptable_return: f64,
    periods_per_year: f64,
    aggregation: Aggregation,
) -> Result<f64> {
    let dd = downside_per_simulation(returns, minimum_acceptable_return, periods_per_year)?;
    Ok(aggregate(&dd, aggregation))
}
