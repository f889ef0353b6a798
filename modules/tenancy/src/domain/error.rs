use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("tenant {id} not found")]
    NotFound { id: Uuid },
    #[error("a tenant with slug '{slug}' already exists")]
    SlugTaken { slug: String },
    #[error("slug must be a non-empty, lowercase, hyphenated identifier")]
    InvalidSlug,
    #[error("tenant {id} is suspended")]
    Suspended { id: Uuid },
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::SlugTaken { .. } => ErrorKind::Conflict,
            DomainError::InvalidSlug => ErrorKind::Validation,
            DomainError::Suspended { .. } => ErrorKind::Forbidden,
            DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
