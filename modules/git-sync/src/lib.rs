//! Two-way synchronizer between a tenant's Git repository and the
//! policy store: pushes policy changes out on create/update/promote,
//! pulls remote changes back in on a tenant-chosen interval, and keeps
//! a per-file sync history for the operator dashboard.

pub mod api;
pub mod domain;
pub mod infra;

mod module;

pub use module::GitSyncModule;
