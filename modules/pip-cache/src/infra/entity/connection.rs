use cc_db::secure::ScopableEntity;
use cc_security::Environment;
use sea_orm::entity::prelude::*;

use crate::domain::{ConnectionKind, ConnectionStatus, DomainError, PipConnection};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pip_connections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: String,
    pub kind: String,
    pub endpoint: String,
    pub credential_vault_id: Uuid,
    pub attribute_mapping: Json,
    pub sync_frequency_seconds: i64,
    pub last_synced_at: Option<ChronoDateTimeUtc>,
    pub status: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ScopableEntity for Entity {
    fn tenant_column() -> Self::Column {
        Column::TenantId
    }
}

impl TryFrom<Model> for PipConnection {
    type Error = DomainError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let environment: Environment =
            m.environment.parse().map_err(|_| DomainError::Database(sea_orm::DbErr::Custom("invalid environment".to_owned())))?;
        let kind: ConnectionKind =
            m.kind.parse().map_err(|_| DomainError::Database(sea_orm::DbErr::Custom("invalid connection kind".to_owned())))?;
        let status = match m.status.as_str() {
            "active" => ConnectionStatus::Active,
            "degraded" => ConnectionStatus::Degraded,
            _ => ConnectionStatus::Disabled,
        };
        Ok(Self {
            id: m.id,
            tenant_id: m.tenant_id,
            environment,
            kind,
            endpoint: m.endpoint,
            credential_vault_id: m.credential_vault_id,
            attribute_mapping: m.attribute_mapping,
            sync_frequency_seconds: m.sync_frequency_seconds,
            last_synced_at: m.last_synced_at,
            status,
            created_at: m.created_at,
        })
    }
}

impl From<&PipConnection> for ActiveModel {
    fn from(c: &PipConnection) -> Self {
        let status = match c.status {
            ConnectionStatus::Active => "active",
            ConnectionStatus::Degraded => "degraded",
            ConnectionStatus::Disabled => "disabled",
        };
        Self {
            id: sea_orm::ActiveValue::Set(c.id),
            tenant_id: sea_orm::ActiveValue::Set(c.tenant_id),
            environment: sea_orm::ActiveValue::Set(c.environment.to_string()),
            kind: sea_orm::ActiveValue::Set(c.kind.as_str().to_owned()),
            endpoint: sea_orm::ActiveValue::Set(c.endpoint.clone()),
            credential_vault_id: sea_orm::ActiveValue::Set(c.credential_vault_id),
            attribute_mapping: sea_orm::ActiveValue::Set(c.attribute_mapping.clone()),
            sync_frequency_seconds: sea_orm::ActiveValue::Set(c.sync_frequency_seconds),
            last_synced_at: sea_orm::ActiveValue::Set(c.last_synced_at),
            status: sea_orm::ActiveValue::Set(status.to_owned()),
            created_at: sea_orm::ActiveValue::Set(c.created_at),
        }
    }
}
