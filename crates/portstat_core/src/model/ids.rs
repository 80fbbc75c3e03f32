//! Identifiers for entities of the loaded dataset

use serde::{Deserialize, Serialize};

/// Position of an asset along the tensor's asset axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub usize);
