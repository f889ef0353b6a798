mod backoff;
mod error;
mod layout;
mod model;
mod service;

pub use backoff::delay_for_attempt;
pub use error::DomainError;
pub use model::{ConflictPolicy, GitConfig, GitConfigRequest, GitConfigResponse, SyncDirection, SyncRecord, SyncStatus};
pub use service::Service;
