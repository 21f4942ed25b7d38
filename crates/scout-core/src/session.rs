//! Process-scoped session identity.
//!
//! A single `session_id` is generated once per process, lazily, under a
//! lock, and stamped onto every audit event the process emits. It is
//! immutable for the remainder of the process's life.

use std::sync::OnceLock;
use uuid::Uuid;

static SESSION_ID: OnceLock<Uuid> = OnceLock::new();

/// Return this process's session id, generating it on first call.
///
/// Subsequent calls (from any thread) return the same value.
pub fn session_id() -> Uuid {
    *SESSION_ID.get_or_init(Uuid::new_v4)
}
