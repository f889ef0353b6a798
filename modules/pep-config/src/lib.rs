//! Global and per-PEP configuration storage, plus the deterministic
//! merge engine that resolves what each PEP receives when it polls.

pub mod api;
pub mod domain;
pub mod infra;

mod module;

pub use module::{PepConfigClient, PepConfigModule};
