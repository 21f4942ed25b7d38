//! Exercises `scout-core`'s public surface the way `scout-cli` (an external
//! crate) does: load configuration, consult the budget gate, validate a
//! suggestion against the real filesystem, and append the outcome to the
//! audit log. These tests only touch items re-exported from the crate
//! root or from `pub mod` surfaces, never internal-only items.

use scout_core::config::ConfigResolver;
use scout_core::validator::Suggestion;
use scout_core::{AuditLog, Event, EventKind, IgnoreSet, RealFileSystem, ScoutConfig, Validator};
use std::fs;

#[test]
fn config_resolver_loads_defaults_with_no_yaml_present() {
    let repo = tempfile::tempdir().unwrap();
    let config = ConfigResolver::new(repo.path()).load().unwrap();
    let defaults = ScoutConfig::default();
    assert_eq!(config.limits.hourly_budget, defaults.limits.hourly_budget);
    assert_eq!(
        config.limits.max_cost_per_event,
        defaults.limits.max_cost_per_event
    );
}

#[test]
fn config_resolver_merges_project_layer_over_defaults() {
    let repo = tempfile::tempdir().unwrap();
    fs::create_dir_all(repo.path().join(".scout")).unwrap();
    fs::write(
        repo.path().join(".scout/config.yaml"),
        "limits:\n  hourly_budget: 1.0\n",
    )
    .unwrap();

    let config = ConfigResolver::new(repo.path()).load().unwrap();
    assert_eq!(config.limits.hourly_budget, 1.0);
}

#[test]
fn should_process_denies_spend_over_the_hard_cap_regardless_of_config() {
    let mut config = ScoutConfig::default();
    config.limits.max_cost_per_event = 100.0;
    assert!(!config.should_process(1.0, None, 0.0));
}

#[test]
fn ignore_set_and_config_resolve_trigger_compose_for_on_commit_wiring() {
    let repo = tempfile::tempdir().unwrap();
    let ignore = IgnoreSet::load(repo.path());
    let config = ConfigResolver::new(repo.path()).load().unwrap();

    let source = std::path::Path::new("src/lib.rs");
    let vendored = std::path::Path::new("node_modules/pkg/index.js");

    assert!(!ignore.matches(source, repo.path()));
    assert!(ignore.matches(vendored, repo.path()));

    // A file scout-cli decides to process still needs a resolved trigger.
    let trigger = config.resolve_trigger(source);
    assert!(trigger.max_cost >= 0.0);
}

#[test]
fn validator_against_real_filesystem_confirms_a_correct_suggestion() {
    let repo = tempfile::tempdir().unwrap();
    fs::write(repo.path().join("foo.py"), "def bar():\n    pass\n").unwrap();

    let suggestion = Suggestion {
        file: Some("foo.py".to_string()),
        symbol: Some("bar".to_string()),
        line: Some(1),
        confidence: 90,
    };

    let validator = Validator::new(&RealFileSystem, repo.path().to_path_buf());
    let result = validator.validate(&suggestion);

    assert!(result.is_valid);
    assert_eq!(result.adjusted_confidence, 90);
}

#[test]
fn audit_log_roundtrips_an_event_written_by_a_downstream_crate() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::open(dir.path().join("audit.jsonl"));

    let event = Event::new(EventKind::ValidationFail)
        .with_reason("symbol not found")
        .with_confidence(40);
    log.append(&event).unwrap();

    let events = log.last_events(10, None);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, EventKind::ValidationFail);
    assert_eq!(events[0].reason.as_deref(), Some("symbol not found"));
}
