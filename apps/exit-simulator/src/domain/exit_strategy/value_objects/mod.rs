//! Exit Strategy Value Objects

mod exit_rule;
mod global_overrides;

pub use exit_rule::{ExitRule, ExitRuleDefinition, RuleKind};
pub use global_overrides::{GlobalOverrides, StagnationWindow};
