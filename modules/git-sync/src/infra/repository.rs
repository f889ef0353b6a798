use cc_db::DbConn;
use cc_db::secure::apply_scope;
use cc_security::AccessScope;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::domain::{DomainError, GitConfig, SyncRecord};
use crate::infra::entity::{git_config, sync_record};

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn get(&self, tenant_id: Uuid) -> Result<Option<GitConfig>, DomainError> {
        git_config::Entity::find_by_id(tenant_id).one(self.db.inner()).await?.map(TryInto::try_into).transpose()
    }

    pub async fn upsert(&self, config: &GitConfig) -> Result<(), DomainError> {
        git_config::Entity::insert(git_config::ActiveModel::from(config))
            .on_conflict(
                OnConflict::column(git_config::Column::TenantId)
                    .update_columns([
                        git_config::Column::RemoteUrl,
                        git_config::Column::Branch,
                        git_config::Column::CredentialVaultId,
                        git_config::Column::AutoSyncIntervalSeconds,
                        git_config::Column::ConflictPolicy,
                        git_config::Column::LastPullAt,
                        git_config::Column::LastPullStatus,
                    ])
                    .to_owned(),
            )
            .exec(self.db.inner())
            .await?;
        Ok(())
    }

    /// Every configured tenant, for the periodic pull sweep to filter
    /// by its own `auto_sync_interval_seconds`. The fleet of tenants
    /// with Git sync enabled is expected to stay small enough that a
    /// full scan every sweep tick is cheaper than tracking due-dates in
    /// SQL.
    pub async fn list_all(&self) -> Result<Vec<GitConfig>, DomainError> {
        git_config::Entity::find().all(self.db.inner()).await?.into_iter().map(TryInto::try_into).collect()
    }

    pub async fn record_pull_status(&self, tenant_id: Uuid, at: chrono::DateTime<chrono::Utc>, status: &str) -> Result<(), DomainError> {
        if let Some(model) = git_config::Entity::find_by_id(tenant_id).one(self.db.inner()).await? {
            let mut active: git_config::ActiveModel = model.into();
            active.last_pull_at = sea_orm::ActiveValue::Set(Some(at));
            active.last_pull_status = sea_orm::ActiveValue::Set(Some(status.to_owned()));
            git_config::Entity::update(active).exec(self.db.inner()).await?;
        }
        Ok(())
    }

    pub async fn insert_history(&self, record: &SyncRecord) -> Result<(), DomainError> {
        sync_record::Entity::insert(sync_record::ActiveModel::from(record)).exec(self.db.inner()).await?;
        Ok(())
    }

    pub async fn list_history(&self, scope: &AccessScope, skip: u64, limit: u64) -> Result<Vec<SyncRecord>, DomainError> {
        let rows = apply_scope(sync_record::Entity::find(), scope)
            .order_by_desc(sync_record::Column::OccurredAt)
            .paginate(self.db.inner(), limit.max(1))
            .fetch_page(skip / limit.max(1))
            .await?;
        rows.into_iter().map(|m| SyncRecord::try_from(m).map_err(|e| DomainError::Database(sea_orm::DbErr::Custom(e.to_string())))).collect()
    }
}
