//! Assembles per-PEP policy bundles: content-addressed, reproducible,
//! served from cache and rebuilt asynchronously on policy change.

pub mod api;
pub mod domain;
pub mod infra;

mod module;

pub use module::{BundleBuilderClient, BundleBuilderModule};
