use cc_db::DbConn;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::{DomainError, Tenant};
use crate::infra::entity::{self, Entity as TenantEntity};

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(&self, name: String, slug: String) -> Result<Tenant, DomainError> {
        if TenantEntity::find().filter(entity::Column::Slug.eq(slug.clone())).one(self.db.inner()).await?.is_some() {
            return Err(DomainError::SlugTaken { slug });
        }
        let model = entity::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            slug: ActiveValue::Set(slug),
            name: ActiveValue::Set(name),
            suspended: ActiveValue::Set(false),
            created_at: ActiveValue::Set(chrono::Utc::now()),
        };
        Ok(model.insert(self.db.inner()).await?.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Tenant, DomainError> {
        TenantEntity::find_by_id(id)
            .one(self.db.inner())
            .await?
            .map(Into::into)
            .ok_or(DomainError::NotFound { id })
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, DomainError> {
        Ok(TenantEntity::find().all(self.db.inner()).await?.into_iter().map(Into::into).collect())
    }
}
