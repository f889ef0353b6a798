use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("policy {id} not found")]
    NotFound { id: Uuid },
    #[error("policy source failed validation: {0}")]
    InvalidSource(String),
    #[error("policy {id} is in production and production writes are locked")]
    ProductionWriteLocked { id: Uuid },
    #[error("policy {id} has already been retired")]
    AlreadyRetired { id: Uuid },
    #[error("policy {id} has no sandbox row to promote")]
    NotInSandbox { id: Uuid },
    #[error("template {id} not found")]
    TemplateNotFound { id: String },
    #[error("resource {resource_id} referenced by target set does not exist")]
    ResourceNotFound { resource_id: Uuid },
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } | DomainError::TemplateNotFound { .. } | DomainError::ResourceNotFound { .. } => ErrorKind::NotFound,
            DomainError::InvalidSource(_) => ErrorKind::Validation,
            DomainError::ProductionWriteLocked { .. } => ErrorKind::ProductionLocked,
            DomainError::AlreadyRetired { .. } | DomainError::NotInSandbox { .. } => ErrorKind::Conflict,
            DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
