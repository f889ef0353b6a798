//! The Tenant registry: every other module's rows hang off a
//! `tenant_id` created here. Not a named component in the control
//! plane's component table, but required by its data model — every
//! resource, policy, PEP and PIP connection belongs to exactly one
//! tenant.

pub mod api;
pub mod domain;
pub mod infra;

mod module;

pub use module::{TenancyClient, TenancyModule};
