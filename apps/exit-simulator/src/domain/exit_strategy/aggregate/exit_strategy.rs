//! Exit strategy aggregate root.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::exit_strategy::errors::StrategyError;
use crate::domain::exit_strategy::value_objects::{
    ExitRule, ExitRuleDefinition, GlobalOverrides, StagnationWindow,
};
use crate::domain::shared::StrategyId;

/// A validated exit strategy.
///
/// Construction goes through [`ExitStrategy::builder`] or deserialization of
/// an [`ExitStrategyDefinition`]; both reject malformed rules, so every
/// instance is safe to simulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExitStrategyDefinition", into = "ExitStrategyDefinition")]
pub struct ExitStrategy {
    id: StrategyId,
    name: String,
    rules: Vec<ExitRule>,
    max_hold_hours: Option<Decimal>,
    stagnation: Option<StagnationWindow>,
    active: bool,
    /// Indices of enabled per-tick rules, sorted by ascending priority.
    evaluation_order: Vec<usize>,
    overrides: GlobalOverrides,
}

impl ExitStrategy {
    /// Start building a strategy.
    #[must_use]
    pub fn builder(id: impl Into<StrategyId>, name: impl Into<String>) -> ExitStrategyBuilder {
        ExitStrategyBuilder::new(id.into(), name.into())
    }

    /// Strategy identifier.
    #[must_use]
    pub const fn id(&self) -> &StrategyId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[ExitRule] {
        &self.rules
    }

    /// Strategy-level hold limit, before merging with time-based rules.
    #[must_use]
    pub const fn max_hold_hours(&self) -> Option<Decimal> {
        self.max_hold_hours
    }

    /// Strategy-level stagnation window, before merging with stagnation rules.
    #[must_use]
    pub const fn stagnation(&self) -> Option<StagnationWindow> {
        self.stagnation
    }

    /// Whether the catalog lists this strategy as active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Effective global overrides.
    #[must_use]
    pub const fn overrides(&self) -> &GlobalOverrides {
        &self.overrides
    }

    /// Enabled per-tick rules with their declaration index, in evaluation order.
    pub fn per_tick_rules(&self) -> impl Iterator<Item = (usize, &ExitRule)> {
        self.evaluation_order
            .iter()
            .map(|&index| (index, &self.rules[index]))
    }

    fn from_parts(
        id: StrategyId,
        name: String,
        rules: Vec<ExitRule>,
        max_hold_hours: Option<Decimal>,
        stagnation: Option<StagnationWindow>,
        active: bool,
    ) -> Result<Self, StrategyError> {
        if id.as_str().trim().is_empty() {
            return Err(StrategyError::EmptyId);
        }

        for (index, rule) in rules.iter().enumerate() {
            rule.validate(index)?;
        }

        if let Some(hours) = max_hold_hours {
            if hours <= Decimal::ZERO {
                return Err(StrategyError::NonPositiveHours {
                    field: "max_hold_hours",
                    value: hours,
                });
            }
        }

        if let Some(window) = stagnation {
            if window.hours <= Decimal::ZERO {
                return Err(StrategyError::NonPositiveHours {
                    field: "stagnation_hours",
                    value: window.hours,
                });
            }
            if window.threshold_pct < Decimal::ZERO {
                return Err(StrategyError::NegativeThreshold {
                    field: "stagnation_threshold_pct",
                    value: window.threshold_pct,
                });
            }
        }

        let mut evaluation_order: Vec<usize> = rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.is_enabled() && rule.priority().is_some())
            .map(|(index, _)| index)
            .collect();
        // Stable sort: equal priorities keep declaration order.
        evaluation_order.sort_by_key(|&index| rules[index].priority());

        let overrides = merge_overrides(&rules, max_hold_hours, stagnation);

        Ok(Self {
            id,
            name,
            rules,
            max_hold_hours,
            stagnation,
            active,
            evaluation_order,
            overrides,
        })
    }
}

fn merge_overrides(
    rules: &[ExitRule],
    max_hold_hours: Option<Decimal>,
    stagnation: Option<StagnationWindow>,
) -> GlobalOverrides {
    let mut hold_limit = max_hold_hours;
    let mut windows: Vec<StagnationWindow> = stagnation.into_iter().collect();

    for rule in rules.iter().filter(|rule| rule.is_enabled()) {
        match rule {
            ExitRule::TimeBased { max_hold_hours, .. } => {
                hold_limit = Some(hold_limit.map_or(*max_hold_hours, |h| h.min(*max_hold_hours)));
            }
            ExitRule::Stagnation {
                stagnation_hours,
                threshold_pct,
                ..
            } => windows.push(StagnationWindow::new(*stagnation_hours, *threshold_pct)),
            ExitRule::TakeProfit { .. } | ExitRule::StopLoss { .. } | ExitRule::TrailingStop { .. } => {}
        }
    }

    GlobalOverrides::new(hold_limit, windows)
}

/// Builder for [`ExitStrategy`].
#[derive(Debug, Clone)]
pub struct ExitStrategyBuilder {
    id: StrategyId,
    name: String,
    rules: Vec<ExitRule>,
    max_hold_hours: Option<Decimal>,
    stagnation: Option<StagnationWindow>,
    active: bool,
}

impl ExitStrategyBuilder {
    fn new(id: StrategyId, name: String) -> Self {
        Self {
            id,
            name,
            rules: Vec::new(),
            max_hold_hours: None,
            stagnation: None,
            active: true,
        }
    }

    /// Append a rule.
    #[must_use]
    pub fn rule(mut self, rule: ExitRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the strategy-level hold limit.
    #[must_use]
    pub const fn max_hold_hours(mut self, hours: Decimal) -> Self {
        self.max_hold_hours = Some(hours);
        self
    }

    /// Set the strategy-level stagnation window.
    #[must_use]
    pub const fn stagnation(mut self, hours: Decimal, threshold_pct: Decimal) -> Self {
        self.stagnation = Some(StagnationWindow::new(hours, threshold_pct));
        self
    }

    /// Mark the strategy inactive in the catalog.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Validate and build the strategy.
    ///
    /// # Errors
    /// Returns [`StrategyError`] if any rule or override is malformed.
    pub fn build(self) -> Result<ExitStrategy, StrategyError> {
        ExitStrategy::from_parts(
            self.id,
            self.name,
            self.rules,
            self.max_hold_hours,
            self.stagnation,
            self.active,
        )
    }
}

/// Catalog record for an exit strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitStrategyDefinition {
    /// Strategy identifier.
    pub id: StrategyId,
    /// Display name.
    pub name: String,
    /// Rules in declaration order.
    #[serde(default)]
    pub rules: Vec<ExitRuleDefinition>,
    /// Strategy-level hold limit in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hold_hours: Option<Decimal>,
    /// Strategy-level stagnation window length in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagnation_hours: Option<Decimal>,
    /// Strategy-level stagnation band in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagnation_threshold_pct: Option<Decimal>,
    /// Whether the strategy is offered for comparison.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl TryFrom<ExitStrategyDefinition> for ExitStrategy {
    type Error = StrategyError;

    fn try_from(definition: ExitStrategyDefinition) -> Result<Self, Self::Error> {
        let stagnation = match (
            definition.stagnation_hours,
            definition.stagnation_threshold_pct,
        ) {
            (Some(hours), Some(threshold)) => Some(StagnationWindow::new(hours, threshold)),
            (None, None) => None,
            _ => return Err(StrategyError::IncompleteStagnation),
        };

        let rules = definition
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| rule.into_rule(index))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_parts(
            definition.id,
            definition.name,
            rules,
            definition.max_hold_hours,
            stagnation,
            definition.active,
        )
    }
}

impl From<ExitStrategy> for ExitStrategyDefinition {
    fn from(strategy: ExitStrategy) -> Self {
        Self {
            id: strategy.id,
            name: strategy.name,
            rules: strategy.rules.into_iter().map(Into::into).collect(),
            max_hold_hours: strategy.max_hold_hours,
            stagnation_hours: strategy.stagnation.map(|w| w.hours),
            stagnation_threshold_pct: strategy.stagnation.map(|w| w.threshold_pct),
            active: strategy.active,
        }
    }
}
