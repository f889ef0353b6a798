use cc_db::DbConn;
use cc_db::secure::apply_scope;
use cc_security::AccessScope;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::{Bundle, DomainError};
use crate::infra::entity::bundle;

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn get_latest(&self, scope: &AccessScope, pep_id: Uuid) -> Result<Option<Bundle>, DomainError> {
        let model = apply_scope(bundle::Entity::find(), scope).filter(bundle::Column::PepId.eq(pep_id)).one(self.db.inner()).await?;
        model.map(TryInto::try_into).transpose().map_err(|e: bundle::DecodeError| DomainError::Database(sea_orm::DbErr::Custom(e.to_string())))
    }

    pub async fn upsert(&self, built: &Bundle) -> Result<(), DomainError> {
        let model = bundle::ActiveModel::from(built);
        bundle::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([bundle::Column::TenantId, bundle::Column::PepId])
                    .update_columns([
                        bundle::Column::Environment,
                        bundle::Column::Version,
                        bundle::Column::SourcePolicyIds,
                        bundle::Column::DataManifest,
                        bundle::Column::Checksum,
                        bundle::Column::BuilderTimestamp,
                    ])
                    .to_owned(),
            )
            .exec(self.db.inner())
            .await?;
        Ok(())
    }
}
