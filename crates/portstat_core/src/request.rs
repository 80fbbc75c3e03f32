//! Request-level configuration for statistic and asset-metric evaluation.
//!
//! Requests deserialize with defaults for every optional field and reject
//! unknown keys. Option strings become closed enums during deserialization,
//! so [`StatisticRequest::validate`] only has numeric ranges left to check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::asset_metrics::MetricsConfig;
use crate::error::{Result, StatsError};
use crate::model::{
    Aggregation, CorrelationMethod, DegeneratePolicy, Rebalance, VarMethod, VarTail,
};
use crate::stats::DEFAULT_PERCENTILES;

/// Largest number of requests accepted by one batch evaluation
pub const MAX_BATCH_SIZE: usize = 100;

/// Every statistic the engine can evaluate by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Statistic {
    AnnualisedReturn,
    AnnualisedVolatility,
    SharpeRatio,
    TrackingError,
    DownsideDeviation,
    ValueAtRisk,
    ConditionalValueAtRisk,
    MaximumDrawdown,
    SortinoRatio,
    InformationRatio,
    CalmarRatio,
    ValueProjection,
}

impl Statistic {
    pub const ALL: [Statistic; 12] = [
        Self::AnnualisedReturn,
        Self::AnnualisedVolatility,
        Self::SharpeRatio,
        Self::TrackingError,
        Self::DownsideDeviation,
        Self::ValueAtRisk,
        Self::ConditionalValueAtRisk,
        Self::MaximumDrawdown,
        Self::SortinoRatio,
        Self::InformationRatio,
        Self::CalmarRatio,
        Self::ValueProjection,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnnualisedReturn => "annualised_return",
            Self::AnnualisedVolatility => "annualised_volatility",
            Self::SharpeRatio => "sharpe_ratio",
            Self::TrackingError => "tracking_error",
            Self::DownsideDeviation => "downside_deviation",
            Self::ValueAtRisk => "value_at_risk",
            Self::ConditionalValueAtRisk => "conditional_value_at_risk",
            Self::MaximumDrawdown => "maximum_drawdown",
            Self::SortinoRatio => "sortino_ratio",
            Self::InformationRatio => "information_ratio",
            Self::CalmarRatio => "calmar_ratio",
            Self::ValueProjection => "value_projection",
        }
    }

    /// Human-readable description of how the value is computed
    #[must_use]
    pub fn method(&self, request: &StatisticRequest) -> String {
        let confidence = request.confidence * 100.0;
        match self {
            Self::AnnualisedReturn => "Compound Annual Growth Rate (CAGR)".into(),
            Self::AnnualisedVolatility => "Sample Standard Deviation Annualized".into(),
            Self::SharpeRatio => "Sharpe Ratio: (Return - RFR) / Volatility".into(),
            Self::TrackingError => "Standard Deviation of Excess Returns".into(),
            Self::DownsideDeviation => "Root Mean Square of Downside Returns".into(),
            Self::ValueAtRisk => format!(
                "Value at Risk ({confidence:.0}% confidence, {})",
                request.var_type
            ),
            Self::ConditionalValueAtRisk => format!(
                "Conditional Value at Risk ({confidence:.0}% confidence, {})",
                request.var_type
            ),
            Self::MaximumDrawdown => "Peak-to-Trough Maximum Decline".into(),
            Self::SortinoRatio => "Sortino Ratio: (Return - RFR) / Downside Deviation".into(),
            Self::InformationRatio => {
                "Information Ratio: (Return - Benchmark Return) / Tracking Error".into()
            }
            Self::CalmarRatio => "Calmar Ratio: (Return - RFR) / Maximum Drawdown".into(),
            Self::ValueProjection => "Projected Portfolio Value Percentiles".into(),
        }
    }

    /// Whether evaluation needs `benchmark_weights`
    #[must_use]
    pub fn needs_benchmark(&self) -> bool {
        matches!(self, Self::TrackingError | Self::InformationRatio)
    }
}

impl FromStr for Statistic {
    type Err = StatsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| StatsError::InvalidStatistic(s.to_string()))
    }
}

impl TryFrom<String> for Statistic {
    type Error = StatsError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one statistic evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatisticRequest {
    /// One weight per asset in the universe; omitted means equal weights
    #[serde(default)]
    pub weights: Option<Vec<f64>>,

    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    #[serde(default)]
    pub aggregation: Aggregation,

    #[serde(default)]
    pub rebalance: Rebalance,

    #[serde(default)]
    pub var_type: VarMethod,

    #[serde(default)]
    pub var_tail: VarTail,

    #[serde(default = "default_confidence")]
    pub confidence: f64,

    #[serde(default)]
    pub risk_free_rate: f64,

    #[serde(default)]
    pub minimum_acceptable_return: f64,

    /// Required by tracking error and the information ratio
    #[serde(default)]
    pub benchmark_weights: Option<Vec<f64>>,

    #[serde(default)]
    pub include_categories: Option<Vec<String>>,

    #[serde(default)]
    pub exclude_categories: Option<Vec<String>>,

    #[serde(default)]
    pub degenerate_weights: DegeneratePolicy,

    /// Starting value for the projection table
    #[serde(default = "default_initial_value")]
    pub initial_value: f64,

    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
}

fn default_periods_per_year() -> f64 {
    1.0
}

fn default_confidence() -> f64 {
    0.95
}

fn default_initial_value() -> f64 {
    1.0
}

fn default_percentiles() -> Vec<f64> {
    DEFAULT_PERCENTILES.to_vec()
}

impl Default for StatisticRequest {
    fn default() -> Self {
        Self {
            weights: None,
            periods_per_year: default_periods_per_year(),
            aggregation: Aggregation::default(),
            rebalance: Rebalance::default(),
            var_type: VarMethod::default(),
            var_tail: VarTail::default(),
            confidence: default_confidence(),
            risk_free_rate: 0.0,
            minimum_acceptable_return: 0.0,
            benchmark_weights: None,
            include_categories: None,
            exclude_categories: None,
            degenerate_weights: DegeneratePolicy::default(),
            initial_value: default_initial_value(),
            percentiles: default_percentiles(),
        }
    }
}

impl StatisticRequest {
    /// Request with explicit weights and every other field defaulted
    #[must_use]
    pub fn with_weights(weights: Vec<f64>) -> Self {
        Self {
            weights: Some(weights),
            ..Self::default()
        }
    }

    /// Check the numeric fields. Weight vectors are checked against the
    /// universe at evaluation time.
    pub fn validate(&self) -> Result<()> {
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(StatsError::parameter(
                "periods_per_year",
                format!("must be positive and finite, got {}", self.periods_per_year),
            ));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(StatsError::InvalidConfidence(self.confidence));
        }
        for (field, value) in [
            ("risk_free_rate", self.risk_free_rate),
            ("minimum_acceptable_return", self.minimum_acceptable_return),
            ("initial_value", self.initial_value),
        ] {
            if !value.is_finite() {
                return Err(StatsError::parameter(field, format!("must be finite, got {value}")));
            }
        }
        if let Some(bad) = self.percentiles.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(StatsError::parameter(
                "percentiles",
                format!("each level must lie in [0, 1], got {bad}"),
            ));
        }
        Ok(())
    }
}

/// Parameters of one asset-metrics run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetMetricsRequest {
    /// Assets with a positive weight are analyzed; omitted means all assets
    #[serde(default)]
    pub weights: Option<Vec<f64>>,

    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    /// Whether the stored returns are log returns
    #[serde(default)]
    pub is_log: bool,

    #[serde(default)]
    pub aggregation: CorrelationMethod,

    #[serde(default)]
    pub corr_method: CorrelationMethod,
}

impl Default for AssetMetricsRequest {
    fn default() -> Self {
        Self {
            weights: None,
            periods_per_year: default_periods_per_year(),
            is_log: false,
            aggregation: CorrelationMethod::default(),
            corr_method: CorrelationMethod::default(),
        }
    }
}

impl AssetMetricsRequest {
    #[must_use]
    pub fn config(&self) -> MetricsConfig {
        MetricsConfig {
            periods_per_year: self.periods_per_year,
            is_log: self.is_log,
            aggregation: self.aggregation,
            corr_method: self.corr_method,
        }
    }
}
