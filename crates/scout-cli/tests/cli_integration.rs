use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn scout() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("scout")
}

fn scout_in(dir: &std::path::Path) -> Command {
    let mut cmd = scout();
    cmd.arg("--repo-root").arg(dir);
    cmd
}

#[test]
fn config_get_returns_a_default_value() {
    let repo = tempfile::tempdir().unwrap();
    scout_in(repo.path())
        .arg("config")
        .arg("get")
        .arg("limits.hourly_budget")
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn config_get_on_unknown_key_fails() {
    let repo = tempfile::tempdir().unwrap();
    scout_in(repo.path())
        .arg("config")
        .arg("get")
        .arg("nothing.here")
        .assert()
        .failure();
}

#[test]
fn config_set_then_get_round_trips() {
    let repo = tempfile::tempdir().unwrap();
    let scout_dir = repo.path().join(".scout");
    std::fs::create_dir_all(&scout_dir).unwrap();
    // An existing project config.yaml makes `set` target the project layer
    // rather than falling back to the user-global one.
    std::fs::write(scout_dir.join("config.yaml"), "limits:\n  hourly_budget: 2.0\n").unwrap();

    scout_in(repo.path())
        .arg("config")
        .arg("set")
        .arg("limits.max_cost_per_event")
        .arg("0.25")
        .assert()
        .success();

    scout_in(repo.path())
        .arg("config")
        .arg("get")
        .arg("limits.max_cost_per_event")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.25"));
}

#[test]
fn config_show_all_prints_yaml() {
    let repo = tempfile::tempdir().unwrap();
    scout_in(repo.path())
        .arg("config")
        .arg("show-all")
        .assert()
        .success()
        .stdout(predicate::str::contains("triggers"))
        .stdout(predicate::str::contains("limits"));
}

#[test]
fn config_validate_accepts_well_formed_file() {
    let repo = tempfile::tempdir().unwrap();
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(config_file, "limits:\n  hourly_budget: 5.0\n").unwrap();

    scout_in(repo.path())
        .arg("config")
        .arg("validate")
        .arg(config_file.path())
        .assert()
        .success();
}

#[test]
fn config_validate_rejects_malformed_file() {
    let repo = tempfile::tempdir().unwrap();
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(config_file, "limits: [this, is, not, a, mapping]").unwrap();

    scout_in(repo.path())
        .arg("config")
        .arg("validate")
        .arg(config_file.path())
        .assert()
        .failure();
}

#[test]
fn on_commit_with_explicit_files_always_exits_zero() {
    let repo = tempfile::tempdir().unwrap();
    std::fs::write(repo.path().join("a.py"), "def f():\n    pass\n").unwrap();

    scout_in(repo.path())
        .arg("on-commit")
        .arg("a.py")
        .arg("does-not-exist.py")
        .assert()
        .success();
}

#[test]
fn on_commit_reads_paths_from_stdin() {
    let repo = tempfile::tempdir().unwrap();

    scout_in(repo.path())
        .arg("on-commit")
        .write_stdin("src/lib.rs\nnode_modules/pkg/index.js\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("lib.rs"))
        .stdout(predicate::str::contains("node_modules").not());
}

#[test]
fn help_lists_both_subcommands() {
    scout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("on-commit"));
}
