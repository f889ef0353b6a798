use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("no PEP {pep_id}")]
    NotFound { pep_id: Uuid },
    #[error("registration token does not match PEP {pep_id}")]
    TokenMismatch { pep_id: Uuid },
    #[error("pep-config is unavailable")]
    PepConfigUnavailable,
    #[error("bundle-builder is unavailable")]
    BundleBuilderUnavailable,
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::TokenMismatch { .. } => ErrorKind::Unauthenticated,
            DomainError::PepConfigUnavailable | DomainError::BundleBuilderUnavailable => ErrorKind::UpstreamFailure,
            DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
