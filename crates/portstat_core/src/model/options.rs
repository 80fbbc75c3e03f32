//! Closed option enums for every string-typed request parameter.
//!
//! Each enum parses through `FromStr` into the matching `StatsError` variant and
//! deserializes through the same path, so a value is validated once at the
//! boundary and never re-checked inside the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// How portfolio weights evolve between periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Rebalance {
    /// Reset to target weights every period
    #[default]
    Periodic,
    /// Buy-and-hold: weights drift with relative performance
    None,
}

impl Rebalance {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Periodic => "periodic",
            Self::None => "none",
        }
    }
}

impl FromStr for Rebalance {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "periodic" => Ok(Self::Periodic),
            "none" => Ok(Self::None),
            other => Err(StatsError::InvalidRebalanceMethod(other.to_string())),
        }
    }
}

/// How a per-simulation distribution collapses to one scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
}

impl Aggregation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
        }
    }
}

impl FromStr for Aggregation {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            other => Err(StatsError::InvalidAggregationMethod(other.to_string())),
        }
    }
}

/// Which distribution a quantile-based statistic is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum VarMethod {
    /// All `T × S` single-period returns in one distribution
    #[default]
    Pooled,
    /// One distribution of `S` values per period
    YearByYear,
    /// Terminal compounded return of each path
    Cumulative,
}

impl VarMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pooled => "pooled",
            Self::YearByYear => "year_by_year",
            Self::Cumulative => "cumulative",
        }
    }
}

impl FromStr for VarMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pooled" => Ok(Self::Pooled),
            "year_by_year" => Ok(Self::YearByYear),
            "cumulative" => Ok(Self::Cumulative),
            other => Err(StatsError::InvalidVarMethod(other.to_string())),
        }
    }
}

/// Which tail of the distribution VaR/CVaR describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum VarTail {
    /// Loss tail: the `1 - confidence` quantile
    #[default]
    Left,
    /// Gain tail: the `confidence` quantile
    Right,
}

impl VarTail {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for VarTail {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(StatsError::InvalidVarTail(other.to_string())),
        }
    }
}

/// Slicing convention for asset series and correlation estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum CorrelationMethod {
    /// Every `T × S` observation in one sample
    #[default]
    Pooled,
    /// One cross-simulation sample per period
    YearByYear,
    /// One time-series sample per simulation path
    SimulationBySimulation,
}

impl CorrelationMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pooled => "pooled",
            Self::YearByYear => "year_by_year",
            Self::SimulationBySimulation => "simulation_by_simulation",
        }
    }
}

impl FromStr for CorrelationMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pooled" => Ok(Self::Pooled),
            "year_by_year" => Ok(Self::YearByYear),
            "simulation_by_simulation" => Ok(Self::SimulationBySimulation),
            other => Err(StatsError::InvalidCorrelationMethod(other.to_string())),
        }
    }
}

/// What to do when the selected weights sum to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DegeneratePolicy {
    /// Surface `StatsError::DegenerateWeights`
    #[default]
    Fail,
    /// Equal-weight the selected assets
    EqualWeight,
}

impl DegeneratePolicy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::EqualWeight => "equal_weight",
        }
    }
}

impl FromStr for DegeneratePolicy {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "equal_weight" => Ok(Self::EqualWeight),
            other => Err(StatsError::InvalidDegeneratePolicy(other.to_string())),
        }
    }
}

macro_rules! string_option_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = StatsError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

string_option_conversions!(
    Rebalance,
    Aggregation,
    VarMethod,
    VarTail,
    CorrelationMethod,
    DegeneratePolicy,
);
