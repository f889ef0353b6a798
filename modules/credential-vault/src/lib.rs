//! Authenticated-encryption storage for tenant secrets: PIP connection
//! credentials, Git sync tokens, anything another module needs to hold
//! at rest without it ever appearing in a log line or API response.

pub mod domain;
pub mod infra;

mod module;

pub use module::{CredentialVaultClient, CredentialVaultModule};
