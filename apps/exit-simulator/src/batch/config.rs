//! Configuration for batch analysis.

use serde::{Deserialize, Serialize};

/// Configuration for batch analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker threads (0 = rayon's global pool).
    #[serde(default)]
    pub max_threads: usize,

    /// Batches with fewer positions run sequentially.
    #[serde(default = "default_min_parallel_jobs")]
    pub min_parallel_jobs: usize,

    /// Lifetime of cached batch reports, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Whether to log progress after each position.
    #[serde(default = "default_track_progress")]
    pub track_progress: bool,
}

const fn default_min_parallel_jobs() -> usize {
    4
}

const fn default_cache_ttl_secs() -> u64 {
    300
}

const fn default_track_progress() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            min_parallel_jobs: default_min_parallel_jobs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            track_progress: default_track_progress(),
        }
    }
}
