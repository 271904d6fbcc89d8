//! Infrastructure Layer
//!
//! Adapters that feed the in-memory ports from files.

pub mod dataset;

pub use dataset::{Dataset, DatasetError, load_dataset};
