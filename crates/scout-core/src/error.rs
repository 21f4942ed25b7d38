//! Error types shared across the crate.
//!
//! Per the validator's contract, *validation* failures are never errors --
//! they are data, returned as a populated [`crate::validator::ValidationResult`].
//! [`ScoutError`] is reserved for conditions that prevent an operation from
//! producing a result at all: an unreadable config file, an unwritable audit
//! directory, a malformed pattern.

use std::path::PathBuf;
use thiserror::Error;

pub type ScoutResult<T> = Result<T, ScoutError>;

/// Errors that can surface from configuration, audit, or filesystem
/// operations. Validation outcomes are never represented here -- see
/// [`crate::validator::ErrorCode`].
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("could not determine a home directory to locate the user config")]
    NoHomeDirectory,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
