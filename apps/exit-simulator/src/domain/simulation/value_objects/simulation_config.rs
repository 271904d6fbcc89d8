//! Simulation behaviour switches.

use serde::{Deserialize, Serialize};

/// How many per-tick rules may fire on a single price point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameTickPolicy {
    /// Only the first firing rule in priority order is applied.
    #[default]
    FirstTrigger,
    /// Every firing rule is applied in priority order against the shrinking
    /// remainder.
    Cascade,
}

/// Simulation configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Same-tick firing policy.
    #[serde(default)]
    pub same_tick_policy: SameTickPolicy,
}

impl SimulationConfig {
    /// Configuration with the given policy.
    #[must_use]
    pub const fn with_policy(same_tick_policy: SameTickPolicy) -> Self {
        Self { same_tick_policy }
    }
}
