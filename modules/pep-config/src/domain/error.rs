use cc_errors::ErrorKind;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("no global PEP configuration for tenant {tenant_id}")]
    GlobalNotFound { tenant_id: Uuid },
    #[error("no individual PEP configuration for PEP {pep_id}")]
    IndividualNotFound { pep_id: Uuid },
    #[error("invalid poll interval: must be between 10 and 300 seconds")]
    InvalidPollInterval,
    #[error("invalid port: must be between 1 and 65535")]
    InvalidPort,
    #[error("invalid CPU limit: expected `<n>` or `<n>m`")]
    InvalidCpuLimit,
    #[error("invalid memory limit: expected `<n>Mi` or `<n>Gi`")]
    InvalidMemoryLimit,
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::GlobalNotFound { .. } | DomainError::IndividualNotFound { .. } => ErrorKind::NotFound,
            DomainError::InvalidPollInterval | DomainError::InvalidPort | DomainError::InvalidCpuLimit | DomainError::InvalidMemoryLimit => {
                ErrorKind::Validation
            }
            DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
