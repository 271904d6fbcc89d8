//! Dataset location for the command-line runner.

use serde::{Deserialize, Serialize};

/// Dataset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to a JSON dataset of strategies, positions and price histories.
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

fn default_dataset_path() -> String {
    "dataset.json".to_string()
}
