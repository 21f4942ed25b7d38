//! Environment variable overrides.
//!
//! Only the variables declared in [`apply_env_overrides`] are recognized.
//! Unknown variables are ignored. A recognized variable with a malformed
//! value is logged and ignored -- it never aborts configuration loading.

use super::ScoutConfig;

/// Apply recognized `SCOUT_*` environment variables on top of `config`,
/// in place. This is the highest-precedence layer in the merge order.
pub fn apply_env_overrides(config: &mut ScoutConfig) {
    apply_float_env("SCOUT_HOURLY_BUDGET", &mut config.limits.hourly_budget);
    apply_float_env(
        "SCOUT_MAX_COST_PER_EVENT",
        &mut config.limits.max_cost_per_event,
    );

    if let Ok(value) = std::env::var("SCOUT_PRIMARY_MODEL") {
        config.models.primary = Some(value);
    }
    if let Ok(value) = std::env::var("SCOUT_VALIDATOR_MODEL") {
        config.models.validator = Some(value);
    }

    if let Ok(value) = std::env::var("SCOUT_DEFAULT_TRIGGER") {
        match serde_yaml::from_str(&format!("\"{value}\"")) {
            Ok(trigger) => config.triggers.default = trigger,
            Err(_) => {
                tracing::warn!(
                    variable = "SCOUT_DEFAULT_TRIGGER",
                    value = %value,
                    "malformed environment override, ignoring"
                );
            }
        }
    }
}

fn apply_float_env(name: &str, target: &mut f64) {
    let Ok(raw) = std::env::var(name) else {
        return;
    };
    match raw.parse::<f64>() {
        Ok(value) => *target = value,
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "malformed environment override, ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn hourly_budget_override_applies() {
        let _guard = ENV_LOCK.lock().unwrap();
        // SAFETY: serialized by ENV_LOCK; no other thread reads/writes
        // these Scout-specific variables concurrently in this test binary.
        unsafe {
            std::env::set_var("SCOUT_HOURLY_BUDGET", "3.5");
        }
        let mut config = ScoutConfig::default();
        apply_env_overrides(&mut config);
        assert_eq!(config.limits.hourly_budget, 3.5);
        unsafe {
            std::env::remove_var("SCOUT_HOURLY_BUDGET");
        }
    }

    #[test]
    fn malformed_override_is_ignored_not_fatal() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("SCOUT_HOURLY_BUDGET", "not-a-number");
        }
        let mut config = ScoutConfig::default();
        let before = config.limits.hourly_budget;
        apply_env_overrides(&mut config);
        assert_eq!(config.limits.hourly_budget, before);
        unsafe {
            std::env::remove_var("SCOUT_HOURLY_BUDGET");
        }
    }

    #[test]
    fn unknown_variables_are_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("SCOUT_NOT_A_REAL_KEY", "whatever");
        }
        let mut config = ScoutConfig::default();
        let before = config.clone();
        apply_env_overrides(&mut config);
        assert_eq!(before.limits.hourly_budget, config.limits.hourly_budget);
        unsafe {
            std::env::remove_var("SCOUT_NOT_A_REAL_KEY");
        }
    }
}
