//! Owns PEP identity: registration, heartbeat, and the polling
//! contract a PEP uses to fetch its effective configuration and
//! content-addressed policy bundle.

pub mod api;
pub mod domain;
pub mod infra;

mod module;

pub use module::PepCoordinatorModule;
