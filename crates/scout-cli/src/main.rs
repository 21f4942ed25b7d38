//! `scout` -- the thin CLI shell over `scout-core`.
//!
//! Owns no validation, configuration-merge, or audit logic of its own; it
//! parses arguments, wires up `scout-core`, and prints results.

use clap::{Parser, Subcommand};
use colored::Colorize;
use scout_core::config::ConfigResolver;
use scout_core::{IgnoreSet, ScoutConfig};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "scout", version, about = "Ground-truth validation and budget gate for LLM-assisted documentation")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Repository root (defaults to the current directory)
    #[arg(long, global = true)]
    repo_root: Option<PathBuf>,

    /// Increase log verbosity (stacks: -v, -vv); overridden by RUST_LOG if set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect or mutate Scout's layered configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run the ignore matcher and configuration resolver over files
    ///
    /// Reads newline-separated paths from stdin when no files are given.
    /// Always exits 0, regardless of per-file outcomes -- this is meant
    /// to be wired into a Git hook.
    #[command(name = "on-commit")]
    OnCommit { files: Vec<PathBuf> },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the value at a dot-separated key path
    Get { key: String },
    /// Set the value at a dot-separated key path
    Set { key: String, value: String },
    /// Print the fully resolved, merged configuration
    #[command(name = "show-all")]
    ShowAll,
    /// Validate a configuration file, or the merged effective config if no path is given
    Validate { path: Option<PathBuf> },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "scout=warn",
        1 => "scout=info,scout_core=info",
        _ => "scout=debug,scout_core=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let repo_root = cli
        .repo_root
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Command::Config { action } => run_config(&repo_root, action),
        Command::OnCommit { files } => run_on_commit(&repo_root, files),
    }
}

fn run_config(repo_root: &Path, action: ConfigAction) -> ExitCode {
    let resolver = ConfigResolver::new(repo_root);

    match action {
        ConfigAction::Get { key } => match resolver.load().and_then(|config| config.get(&key)) {
            Ok(Some(value)) => {
                print!("{}", serde_yaml::to_string(&value).unwrap_or_default());
                ExitCode::SUCCESS
            }
            Ok(None) => {
                eprintln!("{}", format!("no such key: {key}").red());
                ExitCode::FAILURE
            }
            Err(err) => {
                eprintln!("{}", format!("failed to load configuration: {err}").red());
                ExitCode::FAILURE
            }
        },

        ConfigAction::Set { key, value } => {
            let mut config = match resolver.load() {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("{}", format!("failed to load configuration: {err}").red());
                    return ExitCode::FAILURE;
                }
            };

            let parsed = serde_yaml::from_str(&value)
                .unwrap_or_else(|_| serde_yaml::Value::String(value.clone()));

            if let Err(err) = config.set(&key, parsed) {
                eprintln!("{}", format!("invalid value for {key}: {err}").red());
                return ExitCode::FAILURE;
            }

            if let Err(err) = persist(repo_root, &config) {
                eprintln!("{}", format!("failed to persist configuration: {err}").red());
                return ExitCode::FAILURE;
            }

            println!("{}", format!("{key} set").green());
            ExitCode::SUCCESS
        }

        ConfigAction::ShowAll => match resolver.load() {
            Ok(config) => {
                print!("{}", serde_yaml::to_string(&config).unwrap_or_default());
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{}", format!("failed to load configuration: {err}").red());
                ExitCode::FAILURE
            }
        },

        ConfigAction::Validate { path } => match resolver.validate_yaml(path.as_deref()) {
            Ok(()) => {
                println!("{}", "configuration is valid".green());
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{}", format!("invalid configuration: {err}").red());
                ExitCode::FAILURE
            }
        },
    }
}

/// Write `config` to the project YAML if it exists, otherwise to the
/// user-global YAML, creating the target's parent directory as needed.
fn persist(repo_root: &Path, config: &ScoutConfig) -> anyhow::Result<()> {
    let target = ConfigResolver::new(repo_root).write_target()?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, serde_yaml::to_string(config)?)?;
    Ok(())
}

fn run_on_commit(repo_root: &Path, files: Vec<PathBuf>) -> ExitCode {
    let files = if files.is_empty() {
        read_stdin_paths()
    } else {
        files
    };

    let ignore = IgnoreSet::load(repo_root);
    let config = match ConfigResolver::new(repo_root).load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, falling back to defaults");
            ScoutConfig::default()
        }
    };

    for file in files {
        if ignore.matches(&file, repo_root) {
            tracing::debug!(file = %file.display(), "ignored");
            continue;
        }
        let trigger = config.resolve_trigger(&file);
        println!(
            "{}\t{:?}\tmax_cost=${:.2}",
            file.display(),
            trigger.trigger_type,
            trigger.max_cost
        );
    }

    ExitCode::SUCCESS
}

fn read_stdin_paths() -> Vec<PathBuf> {
    let mut buffer = String::new();
    if io::stdin().read_to_string(&mut buffer).is_err() {
        return Vec::new();
    }
    buffer
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
