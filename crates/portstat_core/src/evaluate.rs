//! Request evaluation against the tensor store.
//!
//! Each call resolves the request's weights and category filter into a
//! selection, builds the portfolio (and benchmark) return matrices for the
//! selected assets, and hands them to the statistics engine. Nothing is
//! computed until every input has been validated.

use std::borrow::Cow;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::asset_metrics::{AssetMetrics, CorrelationEntry, asset_metrics};
use crate::error::{Result, StatsError};
use crate::model::{AssetUniverse, CorrelationMethod, ReturnMatrix, ReturnTensor};
use crate::portfolio::{PathSummary, build_returns, summarize_paths};
use crate::request::{AssetMetricsRequest, MAX_BATCH_SIZE, Statistic, StatisticRequest};
use crate::selection::{
    CategoryFilter, Selection, equal_weights, select_and_normalize_with, validate_weights,
};
use crate::stats::{self, TailRisk, ValueProjection};
use crate::store::TensorStore;

/// Value of an evaluated statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatisticValue {
    Scalar(f64),
    /// One value per period (year-by-year VaR and CVaR)
    Series(Vec<f64>),
    Projection(ValueProjection),
}

impl StatisticValue {
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Self::Series(values) => Some(values),
            _ => None,
        }
    }
}

impl From<TailRisk> for StatisticValue {
    fn from(risk: TailRisk) -> Self {
        match risk {
            TailRisk::Scalar(v) => Self::Scalar(v),
            TailRisk::PerPeriod(values) => Self::Series(values),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticResponse {
    pub statistic: Statistic,
    pub value: StatisticValue,
    pub method: String,
    pub n_assets_used: usize,
    pub timesteps: usize,
    pub simulations: usize,
}

/// Portfolio returns ready for the statistics engine
struct PreparedPortfolio {
    returns: ReturnMatrix,
    benchmark: Option<ReturnMatrix>,
    n_assets_used: usize,
}

/// Resolve the request into portfolio returns. A benchmark is built only when
/// `benchmark_for` names a statistic that compares against one.
fn prepare(
    universe: &AssetUniverse,
    request: &StatisticRequest,
    benchmark_for: Option<Statistic>,
) -> Result<PreparedPortfolio> {
    let n_assets = universe.n_assets();
    let filter = CategoryFilter::new(
        request.include_categories.as_deref(),
        request.exclude_categories.as_deref(),
    )?;

    let weights = match &request.weights {
        Some(w) => {
            validate_weights(w, n_assets)?;
            Cow::Borrowed(w.as_slice())
        }
        None => Cow::Owned(equal_weights(n_assets)),
    };

    let selection = select_and_normalize_with(
        &weights,
        universe.asset_categories(),
        &filter,
        request.degenerate_weights,
    )?;

    let benchmark_selection = if let Some(statistic) = benchmark_for.filter(|s| s.needs_benchmark()) {
        let benchmark = request.benchmark_weights.as_deref().ok_or_else(|| {
            StatsError::parameter(
                "benchmark_weights",
                format!("required for {statistic}"),
            )
        })?;
        validate_weights(benchmark, n_assets)?;
        Some(select_and_normalize_with(
            benchmark,
            universe.asset_categories(),
            &filter,
            request.degenerate_weights,
        )?)
    } else {
        None
    };

    let tensor = selected_tensor(universe.returns(), &selection)?;
    let returns = build_returns(&selection.weights, &tensor, request.rebalance)?;
    let benchmark = benchmark_selection
        .map(|b| build_returns(&b.weights, &tensor, request.rebalance))
        .transpose()?;

    Ok(PreparedPortfolio {
        returns,
        benchmark,
        n_assets_used: selection.n_selected(),
    })
}

fn selected_tensor<'a>(tensor: &'a ReturnTensor, selection: &Selection) -> Result<Cow<'a, ReturnTensor>> {
    if selection.is_full() {
        Ok(Cow::Borrowed(tensor))
    } else {
        Ok(Cow::Owned(tensor.select_assets(&selection.mask)?))
    }
}

fn compute(
    statistic: Statistic,
    request: &StatisticRequest,
    portfolio: &PreparedPortfolio,
) -> Result<StatisticValue> {
    let p = &portfolio.returns;
    let ppy = request.periods_per_year;
    let agg = request.aggregation;
    let benchmark = || {
        portfolio.benchmark.as_ref().ok_or_else(|| {
            StatsError::parameter("benchmark_weights", format!("required for {statistic}"))
        })
    };

    let value: StatisticValue = match statistic {
        Statistic::AnnualisedReturn => StatisticValue::Scalar(stats::annualised_return(p, ppy, agg)?),
        Statistic::AnnualisedVolatility => {
            StatisticValue::Scalar(stats::annualised_volatility(p, ppy, agg)?)
        }
        Statistic::SharpeRatio => {
            StatisticValue::Scalar(stats::sharpe_ratio(p, request.risk_free_rate, ppy, agg)?)
        }
        Statistic::TrackingError => {
            StatisticValue::Scalar(stats::tracking_error(p, benchmark()?, ppy, agg)?)
        }
        Statistic::DownsideDeviation => StatisticValue::Scalar(stats::downside_deviation(
            p,
            request.minimum_acceptable_return,
            ppy,
            agg,
        )?),
        Statistic::ValueAtRisk => {
            stats::value_at_risk(p, request.confidence, request.var_type, request.var_tail)?.into()
        }
        Statistic::ConditionalValueAtRisk => stats::conditional_value_at_risk(
            p,
            request.confidence,
            request.var_type,
            request.var_tail,
        )?
        .into(),
        Statistic::MaximumDrawdown => StatisticValue::Scalar(stats::maximum_drawdown(p, agg)?),
        Statistic::SortinoRatio => StatisticValue::Scalar(stats::sortino_ratio(
            p,
            request.risk_free_rate,
            request.minimum_acceptable_return,
            ppy,
            agg,
        )?),
        Statistic::InformationRatio => {
            StatisticValue::Scalar(stats::information_ratio(p, benchmark()?, ppy, agg)?)
        }
        Statistic::CalmarRatio => {
            StatisticValue::Scalar(stats::calmar_ratio(p, request.risk_free_rate, ppy, agg)?)
        }
        Statistic::ValueProjection => StatisticValue::Projection(stats::value_projection(
            p,
            request.initial_value,
            &request.percentiles,
        )?),
    };
    Ok(value)
}

/// Evaluate one statistic for one request.
pub fn evaluate(
    store: &TensorStore,
    statistic: Statistic,
    request: &StatisticRequest,
) -> Result<StatisticResponse> {
    request.validate()?;
    let universe = store.get_tensor()?;
    let portfolio = prepare(&universe, request, Some(statistic))?;
    let value = compute(statistic, request, &portfolio)?;

    tracing::debug!(
        statistic = statistic.as_str(),
        n_assets_used = portfolio.n_assets_used,
        rebalance = request.rebalance.as_str(),
        "Evaluated statistic"
    );

    Ok(StatisticResponse {
        statistic,
        value,
        method: statistic.method(request),
        n_assets_used: portfolio.n_assets_used,
        timesteps: portfolio.returns.n_periods(),
        simulations: portfolio.returns.n_simulations(),
    })
}

/// Evaluate one statistic for up to [`MAX_BATCH_SIZE`] independent requests.
///
/// Results keep the input order; a failing request does not affect the others.
pub fn evaluate_batch(
    store: &TensorStore,
    statistic: Statistic,
    requests: &[StatisticRequest],
) -> Result<Vec<Result<StatisticResponse>>> {
    if requests.is_empty() || requests.len() > MAX_BATCH_SIZE {
        return Err(StatsError::parameter(
            "requests",
            format!(
                "batch must contain between 1 and {MAX_BATCH_SIZE} requests, got {}",
                requests.len()
            ),
        ));
    }
    // Fail the whole batch up front when there is nothing to evaluate against
    store.get_tensor()?;

    #[cfg(feature = "parallel")]
    let results = requests
        .par_iter()
        .map(|request| evaluate(store, statistic, request))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results = requests
        .iter()
        .map(|request| evaluate(store, statistic, request))
        .collect();

    Ok(results)
}

/// Per-simulation summary of the request's portfolio paths.
///
/// Uses the same weights, category filter and rebalance policy as
/// [`evaluate`]; benchmark weights are ignored.
pub fn evaluate_path_summary(store: &TensorStore, request: &StatisticRequest) -> Result<PathSummary> {
    request.validate()?;
    let universe = store.get_tensor()?;
    let portfolio = prepare(&universe, request, None)?;
    let summary = summarize_paths(&portfolio.returns, request.periods_per_year)?;

    tracing::debug!(
        n_assets_used = portfolio.n_assets_used,
        simulations = portfolio.returns.n_simulations(),
        "Summarized portfolio paths"
    );
    Ok(summary)
}

/// One analyzed asset with its category resolved from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetricsEntry {
    pub asset: String,
    pub category: String,
    pub weight: f64,
    pub annualised_return: f64,
    pub annualised_volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetricsReport {
    pub per_asset: Vec<AssetMetricsEntry>,
    pub correlation_matrix: Vec<CorrelationEntry>,
    pub aggregation: CorrelationMethod,
    pub corr_method: CorrelationMethod,
    pub n_assets_used: usize,
}

/// Per-asset metrics and correlations for the assets with positive weight.
pub fn evaluate_asset_metrics(
    store: &TensorStore,
    request: &AssetMetricsRequest,
) -> Result<AssetMetricsReport> {
    let universe = store.get_tensor()?;
    let n_assets = universe.n_assets();
    let weights = match &request.weights {
        Some(w) => {
            validate_weights(w, n_assets)?;
            Cow::Borrowed(w.as_slice())
        }
        None => Cow::Owned(equal_weights(n_assets)),
    };

    let config = request.config();
    let AssetMetrics {
        per_asset,
        correlation_matrix,
    } = asset_metrics(universe.returns(), universe.asset_names(), &weights, &config)?;

    let included = (0..n_assets).filter(|a| weights[*a] > 0.0);
    let per_asset: Vec<AssetMetricsEntry> = per_asset
        .into_iter()
        .zip(included)
        .map(|(metric, a)| AssetMetricsEntry {
            asset: metric.asset,
            category: universe.asset_categories()[a].clone(),
            weight: metric.weight,
            annualised_return: metric.annualised_return,
            annualised_volatility: metric.annualised_volatility,
        })
        .collect();

    Ok(AssetMetricsReport {
        n_assets_used: per_asset.len(),
        per_asset,
        correlation_matrix,
        aggregation: config.aggregation,
        corr_method: config.corr_method,
    })
}
