use cc_db::secure::ScopableEntity;
use sea_orm::entity::prelude::*;

use crate::domain::{ConflictPolicy, DomainError, GitConfig};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "git_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: Uuid,
    pub remote_url: String,
    pub branch: String,
    pub credential_vault_id: Uuid,
    pub auto_sync_interval_seconds: i64,
    pub conflict_policy: String,
    pub last_pull_at: Option<ChronoDateTimeUtc>,
    pub last_pull_status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ScopableEntity for Entity {
    fn tenant_column() -> Self::Column {
        Column::TenantId
    }
}

impl TryFrom<Model> for GitConfig {
    type Error = DomainError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let conflict_policy = m.conflict_policy.parse::<ConflictPolicy>().map_err(|_| DomainError::Database(sea_orm::DbErr::Custom("invalid conflict_policy".to_owned())))?;
        Ok(Self {
            tenant_id: m.tenant_id,
            remote_url: m.remote_url,
            branch: m.branch,
            credential_vault_id: m.credential_vault_id,
            auto_sync_interval_seconds: m.auto_sync_interval_seconds,
            conflict_policy,
            last_pull_at: m.last_pull_at,
            last_pull_status: m.last_pull_status,
        })
    }
}

impl From<&GitConfig> for ActiveModel {
    fn from(c: &GitConfig) -> Self {
        Self {
            tenant_id: sea_orm::ActiveValue::Set(c.tenant_id),
            remote_url: sea_orm::ActiveValue::Set(c.remote_url.clone()),
            branch: sea_orm::ActiveValue::Set(c.branch.clone()),
            credential_vault_id: sea_orm::ActiveValue::Set(c.credential_vault_id),
            auto_sync_interval_seconds: sea_orm::ActiveValue::Set(c.auto_sync_interval_seconds),
            conflict_policy: sea_orm::ActiveValue::Set(c.conflict_policy.as_str().to_owned()),
            last_pull_at: sea_orm::ActiveValue::Set(c.last_pull_at),
            last_pull_status: sea_orm::ActiveValue::Set(c.last_pull_status.clone()),
        }
    }
}
