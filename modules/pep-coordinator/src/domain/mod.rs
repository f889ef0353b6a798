mod error;
mod model;
mod service;
mod token;

pub use error::DomainError;
pub use model::{FetchBundleQuery, HeartbeatRequest, Pep, PepHealth, PollResponse, RegisterRequest, Registration};
pub use service::{BundleFetchOutcome, Service};
