use cc_security::AccessScope;
use uuid::Uuid;

use super::{DomainError, Resource};
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

    #[tracing::instrument(skip(self, attributes))]
    pub async fn register(
        &self,
        scope: &AccessScope,
        kind: String,
        external_id: String,
        display_name: String,
        attributes: serde_json::Value,
    ) -> Result<Resource, DomainError> {
        if kind.trim().is_empty() {
            return Err(DomainError::EmptyKind);
        }
        self.repository.upsert(scope, kind, external_id, display_name, attributes).await
    }

    pub async fn get(&self, scope: &AccessScope, id: Uuid) -> Result<Resource, DomainError> {
        self.repository.get(scope, id).await
    }

    pub async fn list_by_kind(&self, scope: &AccessScope, kind: &str) -> Result<Vec<Resource>, DomainError> {
        self.repository.list_by_kind(scope, kind).await
    }
}
