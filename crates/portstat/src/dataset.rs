//! Dataset and request file loading.
//!
//! The dataset is a JSON document:
//!
//! ```json
//! {
//!   "asset_names": ["US Equity", "Treasuries"],
//!   "asset_categories": ["Equity", "Bond"],
//!   "returns": [[[0.1, 0.2], [0.05, -0.1]], [[0.03, 0.02], [0.01, 0.04]]]
//! }
//! ```
//!
//! `returns` is nested `[asset][period][simulation]`. Requests are YAML
//! mappings of the request fields; a missing request file means all defaults.

use std::fs;
use std::path::Path;

use portstat_core::{AssetUniverse, ReturnTensor, StatsError};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Error types for loading input files
#[derive(Debug)]
pub enum InputError {
    Io(String),
    Parse(String),
    Dataset(StatsError),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Io(msg) => write!(f, "IO error: {}", msg),
            InputError::Parse(msg) => write!(f, "Parse error: {}", msg),
            InputError::Dataset(err) => write!(f, "Dataset error: {}", err),
        }
    }
}

impl std::error::Error for InputError {}

impl From<StatsError> for InputError {
    fn from(err: StatsError) -> Self {
        InputError::Dataset(err)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetFile {
    asset_names: Vec<String>,
    asset_categories: Vec<String>,
    returns: Vec<Vec<Vec<f64>>>,
}

/// Read and validate a JSON dataset.
pub fn load_dataset(path: &Path) -> Result<AssetUniverse, InputError> {
    let content = fs::read_to_string(path)
        .map_err(|e| InputError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_dataset(&content)
}

pub fn parse_dataset(content: &str) -> Result<AssetUniverse, InputError> {
    let file: DatasetFile = serde_json::from_str(content)
        .map_err(|e| InputError::Parse(format!("Failed to parse dataset: {}", e)))?;
    let tensor = ReturnTensor::from_nested(&file.returns)?;
    Ok(AssetUniverse::new(
        tensor,
        file.asset_names,
        file.asset_categories,
    )?)
}

/// Read a YAML request, falling back to the type's defaults without a file.
pub fn load_request<T>(path: Option<&Path>) -> Result<T, InputError>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let content = fs::read_to_string(path)
        .map_err(|e| InputError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_saphyr::from_str(&content)
        .map_err(|e| InputError::Parse(format!("Failed to parse request: {}", e)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use portstat_core::{
        AssetMetricsRequest, CorrelationMethod, Rebalance, StatisticRequest, VarMethod,
    };
    use tempfile::NamedTempFile;

    use super::*;

    const DATASET: &str = r#"{
        "asset_names": ["US Equity", "Treasuries"],
        "asset_categories": ["Equity", "Bond"],
        "returns": [
            [[0.1, 0.2], [0.05, -0.1]],
            [[0.03, 0.02], [0.01, 0.04]]
        ]
    }"#;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_dataset() {
        let file = write_temp(DATASET);
        let universe = load_dataset(file.path()).unwrap();
        assert_eq!(universe.returns().shape(), (2, 2, 2));
        assert_eq!(universe.asset_names()[1], "Treasuries");
        assert_eq!(universe.categories(), vec!["Bond", "Equity"]);
    }

    #[test]
    fn test_dataset_validation_errors() {
        let ragged = r#"{
            "asset_names": ["A", "B"],
            "asset_categories": ["Equity"],
            "returns": [[[0.1]], [[0.2]]]
        }"#;
        assert!(matches!(
            parse_dataset(ragged),
            Err(InputError::Dataset(StatsError::InvalidDataset(_)))
        ));
        assert!(matches!(parse_dataset("{"), Err(InputError::Parse(_))));
        assert!(matches!(
            load_dataset(Path::new("/nonexistent/dataset.json")),
            Err(InputError::Io(_))
        ));
    }

    #[test]
    fn test_load_statistic_request() {
        let file = write_temp(
            "weights: [0.6, 0.4]\nrebalance: none\nvar_type: year_by_year\nconfidence: 0.99\n",
        );
        let request: StatisticRequest = load_request(Some(file.path())).unwrap();
        assert_eq!(request.weights, Some(vec![0.6, 0.4]));
        assert_eq!(request.rebalance, Rebalance::None);
        assert_eq!(request.var_type, VarMethod::YearByYear);
        assert_eq!(request.confidence, 0.99);
        assert_eq!(request.periods_per_year, 1.0);
    }

    #[test]
    fn test_request_defaults_without_file() {
        let request: AssetMetricsRequest = load_request(None).unwrap();
        assert_eq!(request, AssetMetricsRequest::default());

        let empty = write_temp("");
        let request: AssetMetricsRequest = load_request(Some(empty.path())).unwrap();
        assert_eq!(request.corr_method, CorrelationMethod::Pooled);
    }

    #[test]
    fn test_request_rejects_bad_values() {
        let file = write_temp("aggregation: mode\n");
        let result: Result<StatisticRequest, _> = load_request(Some(file.path()));
        assert!(matches!(result, Err(InputError::Parse(_))));
    }
}
