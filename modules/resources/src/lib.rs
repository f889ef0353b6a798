//! Protected Resource registry: the things a policy grants or denies
//! access to. Each resource is fingerprinted from its kind and
//! attributes so the same underlying object registered twice collapses
//! to one row instead of duplicating.

pub mod api;
pub mod domain;
pub mod infra;

mod module;

pub use module::{ResourcesClient, ResourcesModule};
