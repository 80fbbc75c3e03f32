//! Return tensor store.
//!
//! Holds the single dataset loaded at startup. The store is an explicit object
//! handed to whoever needs it; once initialized, readers share the dataset
//! through an `Arc` with no locking.

use std::sync::{Arc, OnceLock};

use crate::error::{Result, StatsError};
use crate::model::AssetUniverse;

#[derive(Debug, Default)]
pub struct TensorStore {
    universe: OnceLock<Arc<AssetUniverse>>,
}

impl TensorStore {
    /// Create an empty store. Reads fail until [`TensorStore::initialize`] runs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that is ready immediately.
    #[must_use]
    pub fn with_universe(universe: AssetUniverse) -> Self {
        let store = Self::new();
        // A fresh OnceLock always accepts its first value.
        let _ = store.universe.set(Arc::new(universe));
        store
    }

    /// Install the dataset. May only succeed once per store.
    pub fn initialize(&self, universe: AssetUniverse) -> Result<()> {
        let (n_assets, n_periods, n_simulations) = universe.returns().shape();
        let n_categories = universe.categories().len();

        self.universe
            .set(Arc::new(universe))
            .map_err(|_| StatsError::AlreadyInitialized)?;

        tracing::info!(
            n_assets,
            n_periods,
            n_simulations,
            n_categories,
            "Return tensor store initialized"
        );
        Ok(())
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.universe.get().is_some()
    }

    /// Shared handle to the loaded dataset.
    pub fn get_tensor(&self) -> Result<Arc<AssetUniverse>> {
        self.universe
            .get()
            .cloned()
            .ok_or(StatsError::CacheNotInitialized)
    }
}
