use cc_db::secure::ScopableEntity;
use cc_security::Environment;
use pep_config::domain::DeploymentMode;
use sea_orm::entity::prelude::*;

use crate::domain::{Pep, PepHealth};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "peps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: String,
    pub external_id: String,
    pub mode: String,
    pub metadata: Json,
    pub registration_token_hash: String,
    pub last_seen_at: Option<ChronoDateTimeUtc>,
    pub health: String,
    pub registered_at: ChronoDateTimeUtc,
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
#[error("stored PEP row failed to decode: {0}")]
pub struct DecodeError(String);

/// Decoded alongside the row's token hash: every caller that reads a
/// row off the database either needs the hash (to authenticate a
/// bearer token) or explicitly discards it (public listings), never
/// both half-handled in between.
impl TryFrom<Model> for (Pep, String) {
    type Error = DecodeError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let environment: Environment = m.environment.parse().map_err(|_| DecodeError("invalid environment".to_owned()))?;
        let mode = mode_from_str(&m.mode).ok_or_else(|| DecodeError(format!("invalid deployment mode: {}", m.mode)))?;
        let health: PepHealth = m.health.parse().map_err(|_| DecodeError("invalid health".to_owned()))?;
        let pep = Pep {
            id: m.id,
            tenant_id: m.tenant_id,
            environment,
            external_id: m.external_id,
            mode,
            metadata: m.metadata,
            last_seen_at: m.last_seen_at,
            health,
            registered_at: m.registered_at,
        };
        Ok((pep, m.registration_token_hash))
    }
}

pub fn to_active_model(pep: &Pep, token_hash: &str) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::Set(pep.id),
        tenant_id: sea_orm::ActiveValue::Set(pep.tenant_id),
        environment: sea_orm::ActiveValue::Set(pep.environment.to_string()),
        external_id: sea_orm::ActiveValue::Set(pep.external_id.clone()),
        mode: sea_orm::ActiveValue::Set(mode_as_str(pep.mode).to_owned()),
        metadata: sea_orm::ActiveValue::Set(pep.metadata.clone()),
        registration_token_hash: sea_orm::ActiveValue::Set(token_hash.to_owned()),
        last_seen_at: sea_orm::ActiveValue::Set(pep.last_seen_at),
        health: sea_orm::ActiveValue::Set(pep.health.as_str().to_owned()),
        registered_at: sea_orm::ActiveValue::Set(pep.registered_at),
    }
}

fn mode_as_str(mode: DeploymentMode) -> &'static str {
    match mode {
        DeploymentMode::ReverseProxy => "reverse_proxy",
        DeploymentMode::Sidecar => "sidecar",
        DeploymentMode::Mcp => "mcp",
    }
}

fn mode_from_str(s: &str) -> Option<DeploymentMode> {
    match s {
        "reverse_proxy" => Some(DeploymentMode::ReverseProxy),
        "sidecar" => Some(DeploymentMode::Sidecar),
        "mcp" => Some(DeploymentMode::Mcp),
        _ => None,
    }
}
