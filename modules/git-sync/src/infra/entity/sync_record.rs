use cc_db::secure::ScopableEntity;
use cc_security::Environment;
use sea_orm::entity::prelude::*;

use crate::domain::{DomainError, SyncDirection, SyncRecord, SyncStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "git_sync_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: String,
    pub policy_id: Uuid,
    pub direction: String,
    pub status: String,
    pub message: String,
    pub occurred_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ScopableEntity for Entity {
    fn tenant_column() -> Self::Column {
        Column::TenantId
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid sync record row: {0}")]
pub struct DecodeError(String);

impl TryFrom<Model> for SyncRecord {
    type Error = DecodeError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let environment: Environment = m.environment.parse().map_err(|_| DecodeError("environment".to_owned()))?;
        let direction = match m.direction.as_str() {
            "push" => SyncDirection::Push,
            "pull" => SyncDirection::Pull,
            other => return Err(DecodeError(format!("direction `{other}`"))),
        };
        let status = match m.status.as_str() {
            "success" => SyncStatus::Success,
            "failed" => SyncStatus::Failed,
            other => return Err(DecodeError(format!("status `{other}`"))),
        };
        Ok(Self { id: m.id, tenant_id: m.tenant_id, environment, policy_id: m.policy_id, direction, status, message: m.message, occurred_at: m.occurred_at })
    }
}

impl From<&SyncRecord> for ActiveModel {
    fn from(r: &SyncRecord) -> Self {
        Self {
            id: sea_orm::ActiveValue::Set(r.id),
            tenant_id: sea_orm::ActiveValue::Set(r.tenant_id),
            environment: sea_orm::ActiveValue::Set(r.environment.to_string()),
            policy_id: sea_orm::ActiveValue::Set(r.policy_id),
            direction: sea_orm::ActiveValue::Set(match r.direction {
                SyncDirection::Push => "push".to_owned(),
                SyncDirection::Pull => "pull".to_owned(),
            }),
            status: sea_orm::ActiveValue::Set(match r.status {
                SyncStatus::Success => "success".to_owned(),
                SyncStatus::Failed => "failed".to_owned(),
            }),
            message: sea_orm::ActiveValue::Set(r.message.clone()),
            occurred_at: sea_orm::ActiveValue::Set(r.occurred_at),
        }
    }
}
