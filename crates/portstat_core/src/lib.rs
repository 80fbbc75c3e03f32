//! Monte Carlo portfolio analytics
//!
//! This crate evaluates risk and return statistics over a precomputed tensor of
//! simulated asset returns `R[asset, period, simulation]`. It supports:
//! - Category filtering and weight renormalization of the asset universe
//! - Portfolio return construction with periodic rebalancing or buy-and-hold drift
//! - CAGR, volatility, Sharpe, Sortino, Calmar and information ratios
//! - Tracking error, downside deviation and maximum drawdown
//! - Value-at-Risk and CVaR over pooled, per-period or terminal distributions
//! - Per-asset metrics with Fisher-z averaged correlation matrices
//!
//! # Example
//!
//! ```ignore
//! use portstat_core::{AssetUniverse, ReturnTensor, Statistic, StatisticRequest, TensorStore, evaluate};
//!
//! let tensor = ReturnTensor::from_nested(&nested_returns)?;
//! let universe = AssetUniverse::new(tensor, names, categories)?;
//! let store = TensorStore::with_universe(universe);
//!
//! let request = StatisticRequest::with_weights(vec![0.6, 0.4]);
//! let response = evaluate(&store, Statistic::SharpeRatio, &request)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod asset_metrics;
pub mod error;
pub mod evaluate;
pub mod portfolio;
pub mod request;
pub mod selection;
pub mod stats;
pub mod store;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use asset_metrics::{AssetMetrics, CorrelationEntry, MetricsConfig, asset_metrics};
pub use error::{Result, StatsError};
pub use evaluate::{
    AssetMetricsEntry, AssetMetricsReport, StatisticResponse, StatisticValue, evaluate,
    evaluate_asset_metrics, evaluate_batch, evaluate_path_summary,
};
pub use model::{
    Aggregation, AssetId, AssetInfo, AssetListing, AssetUniverse, CorrelationMethod,
    DegeneratePolicy, Rebalance, ReturnMatrix, ReturnTensor, VarMethod, VarTail,
};
pub use portfolio::{PathSummary, build_returns, summarize_paths};
pub use request::{AssetMetricsRequest, Statistic, StatisticRequest};
pub use selection::{CategoryFilter, Selection, select_and_normalize};
pub use store::TensorStore;
