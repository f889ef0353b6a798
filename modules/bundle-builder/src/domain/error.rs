use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("no bundle has been built yet for pep {pep_id}")]
    NotFound { pep_id: Uuid },
    #[error("policy-lifecycle module is not available")]
    PolicyLifecycleUnavailable,
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::PolicyLifecycleUnavailable => ErrorKind::UpstreamFailure,
            DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
