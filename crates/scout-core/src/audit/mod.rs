//! Durable, append-only, rotating audit event journal.
//!
//! The sole source of truth for cost accounting, accuracy metrics, and
//! decision provenance. Events are opaque after write -- never edited,
//! only appended -- and reads never lock out writers (see
//! [`log::AuditLog`]).

mod event;
mod log;

pub use event::{Event, EventKind};
pub use log::{AccuracyMetrics, AuditLog};
