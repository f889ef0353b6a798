use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("vault entry {id} not found")]
    NotFound { id: Uuid },
    #[error("encryption or decryption failed")]
    Crypto,
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Crypto | DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
