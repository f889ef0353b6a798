mod error;
mod model;
mod service;

pub use error::DomainError;
pub use model::Tenant;
pub use service::Service;
