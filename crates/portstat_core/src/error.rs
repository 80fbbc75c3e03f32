//! Error taxonomy for the analytics core.
//!
//! Every variant is a caller-input or startup-sequencing error. Numerical edge
//! cases (zero volatility, zero tracking error, zero drawdown) are never errors;
//! they resolve to defined values inside the statistics engine.

/// Errors raised by the portfolio analytics core
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("dimension mismatch: expected {expected} weights, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("category filter selects no assets")]
    NoMatchingAssets,

    #[error("selected weights sum to zero")]
    DegenerateWeights,

    #[error("shape mismatch: portfolio is {left:?}, benchmark is {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("confidence must be strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error("invalid VaR method '{0}': expected pooled, year_by_year or cumulative")]
    InvalidVarMethod(String),

    #[error("invalid VaR tail '{0}': expected left or right")]
    InvalidVarTail(String),

    #[error("invalid rebalancing strategy '{0}': expected periodic or none")]
    InvalidRebalanceMethod(String),

    #[error("invalid aggregation method '{0}': expected mean or median")]
    InvalidAggregationMethod(String),

    #[error(
        "invalid correlation method '{0}': expected pooled, year_by_year or simulation_by_simulation"
    )]
    InvalidCorrelationMethod(String),

    #[error("invalid degenerate weight policy '{0}': expected fail or equal_weight")]
    InvalidDegeneratePolicy(String),

    #[error("unknown statistic '{0}'")]
    InvalidStatistic(String),

    #[error("invalid category filter: {0}")]
    InvalidCategoryFilter(String),

    #[error("invalid parameter: {field} - {message}")]
    InvalidParameter {
        field: &'static str,
        message: String,
    },

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("return tensor store not initialized")]
    CacheNotInitialized,

    #[error("return tensor store already initialized")]
    AlreadyInitialized,
}

impl StatsError {
    pub(crate) fn parameter(field: &'static str, message: impl Into<String>) -> Self {
        StatsError::InvalidParameter {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
