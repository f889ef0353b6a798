use uuid::Uuid;

use super::{DomainError, Tenant};
use crate::infra::repository::Repository;

#[derive(Clone)]
pub struct Service {
    repository: Repository,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, name: String, slug: String) -> Result<Tenant, DomainError> {
        if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
            return Err(DomainError::InvalidSlug);
        }
        self.repository.create(name, slug).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Tenant, DomainError> {
        let tenant = self.repository.get(id).await?;
        if tenant.suspended {
            return Err(DomainError::Suspended { id });
        }
        Ok(tenant)
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, DomainError> {
        self.repository.list().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service_with_mock(db: sea_orm::DatabaseConnection) -> Service {
        Service::new(Repository::new(cc_db::DbConn::from_connection(db)))
    }

    #[tokio::test]
    async fn rejects_uppercase_slug_before_hitting_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with_mock(db);
        let err = service.create("Acme".to_owned(), "ACME".to_owned()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidSlug));
    }
}
