use cc_errors::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("audit sink is shutting down, entry was not recorded")]
    Closed,
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Closed | DomainError::Database(_) => ErrorKind::Internal,
        }
    }
}
