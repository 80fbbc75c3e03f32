mod ids;
mod options;
mod tensor;
mod universe;

pub use ids::AssetId;
pub use options::{
    Aggregation, CorrelationMethod, DegeneratePolicy, Rebalance, VarMethod, VarTail,
};
pub use tensor::{ReturnMatrix, ReturnTensor};
pub use universe::{AssetInfo, AssetListing, AssetUniverse};
