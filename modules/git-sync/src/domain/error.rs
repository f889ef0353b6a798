use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("no git configuration for tenant {tenant_id}")]
    ConfigNotFound { tenant_id: Uuid },
    #[error("credential-vault module is not available")]
    CredentialVaultUnavailable,
    #[error("policy-lifecycle module is not available")]
    PolicyLifecycleUnavailable,
    #[error("git remote operation failed: {0}")]
    RemoteFailure(String),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::ConfigNotFound { .. } => ErrorKind::NotFound,
            DomainError::CredentialVaultUnavailable | DomainError::PolicyLifecycleUnavailable | DomainError::RemoteFailure(_) => ErrorKind::UpstreamFailure,
            DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
