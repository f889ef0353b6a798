mod error;
mod model;
mod service;

pub use error::DomainError;
pub use model::{Resource, fingerprint};
pub use service::Service;
