//! The loaded dataset: return tensor plus per-asset names and categories.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::ids::AssetId;
use super::tensor::ReturnTensor;
use crate::error::{Result, StatsError};

/// Immutable simulation dataset shared by every request
#[derive(Debug, Clone, PartialEq)]
pub struct AssetUniverse {
    returns: ReturnTensor,
    asset_names: Vec<String>,
    asset_categories: Vec<String>,
}

/// One row of the asset listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub id: AssetId,
    pub name: String,
    pub category: String,
}

/// Every asset sorted by name, plus the distinct categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetListing {
    pub assets: Vec<AssetInfo>,
    pub total_count: usize,
    pub categories: Vec<String>,
}

impl AssetUniverse {
    /// Validate and assemble a dataset.
    ///
    /// Names must be unique and aligned with the tensor's asset axis, and every
    /// return must be finite.
    pub fn new(
        returns: ReturnTensor,
        asset_names: Vec<String>,
        asset_categories: Vec<String>,
    ) -> Result<Self> {
        let n_assets = returns.n_assets();
        if asset_names.len() != n_assets {
            return Err(StatsError::InvalidDataset(format!(
                "tensor has {n_assets} assets but {} names were given",
                asset_names.len()
            )));
        }
        if asset_categories.len() != n_assets {
            return Err(StatsError::InvalidDataset(format!(
                "tensor has {n_assets} assets but {} categories were given",
                asset_categories.len()
            )));
        }

        let mut seen = FxHashSet::default();
        if let Some(duplicate) = asset_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(StatsError::InvalidDataset(format!(
                "asset name '{duplicate}' is not unique"
            )));
        }

        if !returns.is_finite() {
            return Err(StatsError::InvalidDataset(
                "returns contain NaN or infinite values".to_string(),
            ));
        }

        Ok(Self {
            returns,
            asset_names,
            asset_categories,
        })
    }

    #[must_use]
    pub fn returns(&self) -> &ReturnTensor {
        &self.returns
    }

    #[must_use]
    pub fn asset_names(&self) -> &[String] {
        &self.asset_names
    }

    #[must_use]
    pub fn asset_categories(&self) -> &[String] {
        &self.asset_categories
    }

    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.asset_names.len()
    }

    /// Sorted distinct category names
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .asset_categories
            .iter()
            .collect::<FxHashSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        categories.sort();
        categories
    }

    #[must_use]
    pub fn listing(&self) -> AssetListing {
        let mut assets: Vec<AssetInfo> = self
            .asset_names
            .iter()
            .zip(&self.asset_categories)
            .enumerate()
            .map(|(i, (name, category))| AssetInfo {
                id: AssetId(i),
                name: name.clone(),
                category: category.clone(),
            })
            .collect();
        assets.sort_by(|a, b| a.name.cmp(&b.name));

        AssetListing {
            total_count: assets.len(),
            assets,
            categories: self.categories(),
        }
    }
}
