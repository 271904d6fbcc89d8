//! JSON dataset loader.
//!
//! A dataset bundles strategies, positions and price histories:
//!
//! ```json
//! {
//!   "strategies": [{ "id": "tp", "name": "TP", "rules": [...] }],
//!   "positions": [{ "id": "p1", "token": "BONK", "entry_price": "0.5", ... }],
//!   "price_histories": { "p1": [{ "timestamp": "...", "price": "0.6" }] }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::application::ports::{
    InMemoryPositionRepository, InMemoryPriceHistory, InMemoryStrategyCatalog,
};
use crate::domain::exit_strategy::ExitStrategy;
use crate::domain::position::PositionRecord;
use crate::domain::shared::{PositionId, Timestamp};
use crate::domain::simulation::PricePoint;

/// Dataset loading errors.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to read the dataset file.
    #[error("Failed to read dataset '{path}': {source}")]
    ReadError {
        /// Path to the dataset.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The dataset is not valid JSON or holds an invalid strategy.
    #[error("Failed to parse dataset: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Strategies, positions and price histories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Strategy catalog.
    #[serde(default)]
    pub strategies: Vec<ExitStrategy>,
    /// Historical positions.
    #[serde(default)]
    pub positions: Vec<PositionRecord>,
    /// Price history per position.
    #[serde(default)]
    pub price_histories: BTreeMap<PositionId, Vec<PricePoint>>,
}

/// In-memory adapters seeded from a dataset.
pub type DatasetAdapters = (
    Arc<InMemoryPositionRepository>,
    Arc<InMemoryStrategyCatalog>,
    Arc<InMemoryPriceHistory>,
);

impl Dataset {
    /// Parse a dataset from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a strategy is invalid.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Earliest and latest entry times, if there are positions.
    #[must_use]
    pub fn entry_range(&self) -> Option<(Timestamp, Timestamp)> {
        let opened = self.positions.iter().map(PositionRecord::opened_at);
        let from = opened.clone().min()?;
        let to = opened.max()?;
        Some((from, to))
    }

    /// Load the dataset into in-memory adapters.
    #[must_use]
    pub fn into_adapters(self) -> DatasetAdapters {
        let positions = InMemoryPositionRepository::new();
        for position in self.positions {
            positions.insert(position);
        }

        let catalog = InMemoryStrategyCatalog::new();
        for strategy in self.strategies {
            catalog.insert(strategy);
        }

        let histories = InMemoryPriceHistory::new();
        for (position_id, history) in self.price_histories {
            histories.insert(position_id, history);
        }

        (Arc::new(positions), Arc::new(catalog), Arc::new(histories))
    }
}

/// Read and parse a dataset file.
///
/// # Errors
///
/// Returns a `DatasetError` if the file cannot be read or parsed.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| DatasetError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let dataset = Dataset::from_json(&contents)?;

    info!(
        path = %path.display(),
        strategies = dataset.strategies.len(),
        positions = dataset.positions.len(),
        histories = dataset.price_histories.len(),
        "Dataset loaded"
    );

    Ok(dataset)
}
