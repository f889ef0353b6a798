//! Answers `decide` requests: resolves a PEP's active bundle, reads
//! any required PIP attributes, evaluates matching policies, combines
//! their effects, and records the outcome to the audit sink. Decisions
//! are cached on `(bundle_version, subject, resource, action,
//! context)` so a repeat request bypasses the evaluator entirely.

pub mod api;
pub mod domain;

mod module;

pub use module::DecisionEngineModule;
