//! Append-only audit trail for decisions, policy changes and config
//! changes. Writers are buffered per-producer into bounded batches and
//! flushed on a timer or size threshold; a write is acknowledged back
//! to its caller only once its batch has actually landed in storage.

pub mod api;
pub mod domain;
pub mod infra;

mod module;

pub use module::{AuditSinkClient, AuditSinkModule};
