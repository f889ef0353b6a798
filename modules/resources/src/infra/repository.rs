use cc_db::DbConn;
use cc_db::secure::{apply_scope, secure_insert};
use cc_security::AccessScope;
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::{DomainError, Resource, fingerprint};
use crate::infra::entity::{self, Entity as ResourceEntity};

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn upsert(
        &self,
        scope: &AccessScope,
        kind: String,
        external_id: String,
        display_name: String,
        attributes: serde_json::Value,
    ) -> Result<Resource, DomainError> {
        let resource_fingerprint = fingerprint(&kind, &external_id, &attributes);
        let existing = apply_scope(ResourceEntity::find(), scope)
            .filter(entity::Column::Fingerprint.eq(resource_fingerprint.clone()))
            .one(self.db.inner())
            .await?;
        if let Some(existing) = existing {
            return Resource::try_from(existing).map_err(DomainError::Database);
        }

        let model = entity::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(scope.tenant_id().ok_or(DomainError::UnknownTenant { tenant_id: Uuid::nil() })?),
            environment: ActiveValue::Set(scope.environment().map(|e| e.to_string()).unwrap_or_default()),
            kind: ActiveValue::Set(kind),
            external_id: ActiveValue::Set(external_id),
            display_name: ActiveValue::Set(display_name),
            attributes: ActiveValue::Set(attributes),
            fingerprint: ActiveValue::Set(resource_fingerprint),
            created_at: ActiveValue::Set(chrono::Utc::now()),
        };
        let inserted = secure_insert::<entity::Entity, _>(self.db.inner(), model, scope)
            .await
            .map_err(|e| DomainError::Database(sea_orm::DbErr::Custom(e.to_string())))?;
        Resource::try_from(inserted).map_err(DomainError::Database)
    }

    pub async fn get(&self, scope: &AccessScope, id: Uuid) -> Result<Resource, DomainError> {
        let model = apply_scope(ResourceEntity::find_by_id(id), scope).one(self.db.inner()).await?;
        match model {
            Some(model) => Resource::try_from(model).map_err(DomainError::Database),
            None => Err(DomainError::NotFound { id }),
        }
    }

    pub async fn list_by_kind(&self, scope: &AccessScope, kind: &str) -> Result<Vec<Resource>, DomainError> {
        let models = apply_scope(ResourceEntity::find(), scope)
            .filter(entity::Column::Kind.eq(kind))
            .all(self.db.inner())
            .await?;
        models.into_iter().map(|m| Resource::try_from(m).map_err(DomainError::Database)).collect()
    }
}
