//! # scout-core
//!
//! Ground-truth validation, audit logging, and budget-gated configuration
//! for LLM-assisted documentation workflows.
//!
//! Scout sits between a source repository and an LLM client. It does not
//! call the LLM itself; it validates the LLM's claims about code locations
//! against the filesystem, gates spend before a caller invokes the LLM, and
//! records every decision to a durable audit log.
//!
//! ## Stability tiers
//!
//! - **Stable** -- `config`, `error`, `fs`. Breaking changes require a
//!   major version bump.
//! - **Unstable** -- `audit`, `ignore`, `symbols`, `validator`. Interfaces
//!   may change on minor releases while the on-disk formats they produce
//!   (JSON-Lines audit events, YAML config) stay backward compatible.

/// Audit event log: durable, append-only, rotating.
///
/// **Stability: unstable**.
pub mod audit;
/// Layered configuration resolver and budget gate.
///
/// **Stability: stable**.
pub mod config;
/// Error and result types shared across the crate.
///
/// **Stability: stable**.
pub mod error;
/// Filesystem abstraction (real and mock) for dependency injection.
///
/// **Stability: stable**.
pub mod fs;
/// Gitignore-style ignore-pattern matcher.
///
/// **Stability: unstable**.
pub mod ignore;
/// Process-scoped session identity.
///
/// **Stability: stable**.
pub mod session;
/// Top-level symbol extraction and snippet retrieval.
///
/// **Stability: unstable**.
pub mod symbols;
/// Suggestion validator: the gated pipeline at the heart of the crate.
///
/// **Stability: unstable**.
pub mod validator;

pub use audit::{AuditLog, Event, EventKind};
pub use config::{ScoutConfig, TriggerConfig, TriggerType};
pub use error::{ScoutError, ScoutResult};
pub use fs::{FileSystem, RealFileSystem};
pub use ignore::IgnoreSet;
pub use session::session_id;
pub use symbols::{Symbol, SymbolKind};
pub use validator::{ErrorCode, Suggestion, ValidationResult, Validator};
