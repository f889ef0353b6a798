//! External attribute cache feeding the decision engine: PIP
//! connections, per-connection pull refresh, and lazy single-flight
//! fetch on a cache miss with stale-but-usable fallback.

pub mod api;
pub mod domain;
pub mod infra;

mod module;

pub use module::{PipCacheClient, PipCacheModule};
