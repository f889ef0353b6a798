use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("PIP connection {id} not found")]
    ConnectionNotFound { id: Uuid },
    #[error("PIP connection {id} has no registered connector for its kind")]
    UnsupportedKind { id: Uuid },
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("credential lookup failed: {0}")]
    Credential(String),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::ConnectionNotFound { .. } => ErrorKind::NotFound,
            DomainError::UnsupportedKind { .. } => ErrorKind::Validation,
            DomainError::Database(_) | DomainError::Credential(_) => ErrorKind::Internal,
        }
    }
}
