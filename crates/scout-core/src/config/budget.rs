//! The non-overridable budget gate.
//!
//! `HARD_MAX_COST_PER_EVENT` and `HARD_MAX_HOURLY_BUDGET` are compile-time
//! constants. No configuration layer -- defaults, user YAML, project YAML,
//! or environment variable -- can raise them. Every LLM-spending operation
//! is expected to consult [`ScoutConfig::should_process`] before proceeding.

/// Hard per-event spend ceiling, in dollars. No configuration can exceed
/// this regardless of `limits.max_cost_per_event`.
pub const HARD_MAX_COST_PER_EVENT: f64 = 0.50;

/// Hard hourly spend ceiling, in dollars. No configuration can exceed
/// this regardless of `limits.hourly_budget`.
pub const HARD_MAX_HOURLY_BUDGET: f64 = 10.0;

use super::ScoutConfig;
use std::path::Path;

impl ScoutConfig {
    /// The effective per-event cost ceiling for `file_path`, if given, or
    /// the global ceiling otherwise: the minimum of the matching pattern's
    /// `max_cost` (if any), the global `limits.max_cost_per_event`, and
    /// the hard per-event cap.
    pub fn effective_max_cost(&self, file_path: Option<&Path>) -> f64 {
        let mut ceiling = self.limits.max_cost_per_event.min(HARD_MAX_COST_PER_EVENT);

        if let Some(path) = file_path {
            if let Some(pattern_cost) = self.matching_pattern_cost(path) {
                ceiling = ceiling.min(pattern_cost);
            }
        }

        ceiling
    }

    /// Decide whether an operation estimated to cost `estimated_cost` may
    /// proceed, given `hourly_spend` already accrued this hour.
    ///
    /// Returns `true` iff all three hold:
    /// - `estimated_cost <= effective_max_cost(file_path)`
    /// - `estimated_cost <= HARD_MAX_COST_PER_EVENT`
    /// - `hourly_spend + estimated_cost <= min(limits.hourly_budget, HARD_MAX_HOURLY_BUDGET)`
    pub fn should_process(
        &self,
        estimated_cost: f64,
        file_path: Option<&Path>,
        hourly_spend: f64,
    ) -> bool {
        if estimated_cost > self.effective_max_cost(file_path) {
            return false;
        }
        if estimated_cost > HARD_MAX_COST_PER_EVENT {
            return false;
        }
        let hourly_ceiling = self.limits.hourly_budget.min(HARD_MAX_HOURLY_BUDGET);
        if hourly_spend + estimated_cost > hourly_ceiling {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TriggerPattern, TriggerType};

    #[test]
    fn hard_cap_cannot_be_raised_by_user_config() {
        let mut config = ScoutConfig::default();
        config.limits.max_cost_per_event = 100.0;
        assert_eq!(config.effective_max_cost(None), HARD_MAX_COST_PER_EVENT);
        assert!(!config.should_process(HARD_MAX_COST_PER_EVENT + 0.01, None, 0.0));
    }

    #[test]
    fn should_process_denies_over_hard_per_event_cap() {
        let mut config = ScoutConfig::default();
        config.limits.max_cost_per_event = 0.50;
        assert!(!config.should_process(0.60, None, 0.0));
    }

    #[test]
    fn should_process_allows_within_all_ceilings() {
        let config = ScoutConfig::default();
        assert!(config.should_process(0.01, None, 0.0));
    }

    #[test]
    fn should_process_denies_over_hourly_budget() {
        let mut config = ScoutConfig::default();
        config.limits.hourly_budget = 1.0;
        assert!(!config.should_process(0.05, None, 0.99));
    }

    #[test]
    fn pattern_specific_cost_is_respected() {
        let mut config = ScoutConfig::default();
        config.triggers.patterns.push(TriggerPattern {
            pattern: "docs/**".to_string(),
            trigger: TriggerType::OnCommit,
            max_cost: Some(0.01),
        });
        let path = std::path::Path::new("docs/readme.md");
        assert_eq!(config.effective_max_cost(Some(path)), 0.01);
        assert!(!config.should_process(0.02, Some(path), 0.0));
    }

    #[test]
    fn hourly_budget_cannot_exceed_hard_cap_even_if_configured_higher() {
        let mut config = ScoutConfig::default();
        config.limits.hourly_budget = 1_000.0;
        assert!(!config.should_process(0.01, None, HARD_MAX_HOURLY_BUDGET));
    }
}
