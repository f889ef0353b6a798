mod connector;
mod error;
mod model;
mod service;

pub use connector::{ConnectorError, HttpPipConnector, PipConnector};
pub use error::DomainError;
pub use model::{CachedAttribute, ConnectionKind, ConnectionStatus, LookupOutcome, PipConnection};
pub use service::Service;
