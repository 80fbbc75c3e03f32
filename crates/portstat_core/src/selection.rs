//! Asset selection and weight normalization.
//!
//! A category filter becomes a boolean mask over the asset axis; the weights
//! surviving the mask are renormalized to sum to one.

use rustc_hash::FxHashSet;

use crate::error::{Result, StatsError};
use crate::model::DegeneratePolicy;

/// Absolute tolerance on the unit-sum weight constraint
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Optional include/exclude category sets, validated to be disjoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilter {
    include: Option<FxHashSet<String>>,
    exclude: Option<FxHashSet<String>>,
}

impl CategoryFilter {
    /// A filter that keeps every asset
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(include: Option<&[String]>, exclude: Option<&[String]>) -> Result<Self> {
        let to_set = |list: &[String], name: &str| -> Result<FxHashSet<String>> {
            if list.is_empty() {
                return Err(StatsError::InvalidCategoryFilter(format!(
                    "{name} list cannot be empty"
                )));
            }
            Ok(list.iter().cloned().collect())
        };

        let include = include
            .map(|list| to_set(list, "include_categories"))
            .transpose()?;
        let exclude = exclude
            .map(|list| to_set(list, "exclude_categories"))
            .transpose()?;

        if let (Some(inc), Some(exc)) = (&include, &exclude) {
            let mut overlap: Vec<&String> = inc.intersection(exc).collect();
            if !overlap.is_empty() {
                overlap.sort();
                return Err(StatsError::InvalidCategoryFilter(format!(
                    "categories {overlap:?} are both included and excluded"
                )));
            }
        }

        Ok(Self { include, exclude })
    }

    /// Mask over assets given each asset's category.
    #[must_use]
    pub fn mask(&self, asset_categories: &[String]) -> Vec<bool> {
        asset_categories
            .iter()
            .map(|category| {
                let included = self
                    .include
                    .as_ref()
                    .is_none_or(|set| set.contains(category));
                let excluded = self
                    .exclude
                    .as_ref()
                    .is_some_and(|set| set.contains(category));
                included && !excluded
            })
            .collect()
    }
}

/// Renormalized weights for the selected assets plus the mask that chose them
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// One weight per selected asset, summing to 1.0
    pub weights: Vec<f64>,
    /// One flag per asset in the full universe
    pub mask: Vec<bool>,
}

impl Selection {
    #[must_use]
    pub fn n_selected(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.mask.iter().all(|m| *m)
    }
}

/// Check a caller-supplied weight vector against the asset count.
///
/// Weights must be finite, non-negative and sum to one within
/// [`WEIGHT_SUM_TOLERANCE`].
pub fn validate_weights(weights: &[f64], expected_len: usize) -> Result<()> {
    if weights.is_empty() {
        return Err(StatsError::InvalidWeights("weights cannot be empty".into()));
    }
    if weights.len() != expected_len {
        return Err(StatsError::DimensionMismatch {
            expected: expected_len,
            actual: weights.len(),
        });
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(StatsError::InvalidWeights(
            "all weights must be finite".into(),
        ));
    }
    if weights.iter().any(|w| *w < 0.0) {
        return Err(StatsError::InvalidWeights(
            "weights cannot be negative".into(),
        ));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(StatsError::InvalidWeights(format!(
            "weights must sum to 1.0, got {sum:.6}"
        )));
    }
    Ok(())
}

/// Equal-weight vector of length `n`
#[must_use]
pub fn equal_weights(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// Mask the weights by category and renormalize the survivors.
///
/// Fails with `NoMatchingAssets` when the filter selects nothing and with
/// `DegenerateWeights` when every selected weight is zero.
pub fn select_and_normalize(
    weights: &[f64],
    asset_categories: &[String],
    filter: &CategoryFilter,
) -> Result<Selection> {
    select_and_normalize_with(weights, asset_categories, filter, DegeneratePolicy::Fail)
}

/// [`select_and_normalize`] with an explicit policy for zero-sum selections.
pub fn select_and_normalize_with(
    weights: &[f64],
    asset_categories: &[String],
    filter: &CategoryFilter,
    policy: DegeneratePolicy,
) -> Result<Selection> {
    if weights.len() != asset_categories.len() {
        return Err(StatsError::DimensionMismatch {
            expected: asset_categories.len(),
            actual: weights.len(),
        });
    }

    let mask = filter.mask(asset_categories);
    let selected: Vec<f64> = weights
        .iter()
        .zip(&mask)
        .filter(|(_, keep)| **keep)
        .map(|(w, _)| *w)
        .collect();

    if selected.is_empty() {
        return Err(StatsError::NoMatchingAssets);
    }

    let total: f64 = selected.iter().sum();
    let weights = if total == 0.0 {
        match policy {
            DegeneratePolicy::Fail => return Err(StatsError::DegenerateWeights),
            DegeneratePolicy::EqualWeight => {
                tracing::warn!(
                    n_selected = selected.len(),
                    "Selected weights sum to zero, falling back to equal weights"
                );
                equal_weights(selected.len())
            }
        }
    } else {
        selected.iter().map(|w| w / total).collect()
    };

    Ok(Selection { weights, mask })
}
