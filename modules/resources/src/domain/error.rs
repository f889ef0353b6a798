use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("resource {id} not found")]
    NotFound { id: Uuid },
    #[error("tenant {tenant_id} does not exist or is suspended")]
    UnknownTenant { tenant_id: Uuid },
    #[error("resource kind must not be empty")]
    EmptyKind,
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::UnknownTenant { .. } | DomainError::EmptyKind => ErrorKind::Validation,
            DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
