use cc_db::secure::ScopableEntity;
use cc_security::Environment;
use sea_orm::entity::prelude::*;

use crate::domain::{Bundle, DataManifestEntry};

/// One row per `(tenant, pep)`, holding only the newest successfully
/// built version — per the spec's "the coordinator serves the newest
/// successfully built version" contract, older versions are not kept.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bundles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub pep_id: Uuid,
    pub environment: String,
    pub version: String,
    pub source_policy_ids: Json,
    pub data_manifest: Json,
    pub checksum: String,
    pub builder_timestamp: ChronoDateTimeUtc,
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
#[error("stored bundle row failed to decode: {0}")]
pub struct DecodeError(String);

impl TryFrom<Model> for Bundle {
    type Error = DecodeError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let environment: Environment = m.environment.parse().map_err(|_| DecodeError("invalid environment".to_owned()))?;
        let source_policy_ids: Vec<uuid::Uuid> = serde_json::from_value(m.source_policy_ids).map_err(|e| DecodeError(e.to_string()))?;
        let data_manifest: Vec<DataManifestEntry> = serde_json::from_value(m.data_manifest).map_err(|e| DecodeError(e.to_string()))?;
        Ok(Self {
            tenant_id: m.tenant_id,
            pep_id: m.pep_id,
            environment,
            version: m.version,
            source_policy_ids,
            data_manifest,
            checksum: m.checksum,
            builder_timestamp: m.builder_timestamp,
            signature: None,
        })
    }
}

impl From<&Bundle> for ActiveModel {
    fn from(b: &Bundle) -> Self {
        Self {
            tenant_id: sea_orm::ActiveValue::Set(b.tenant_id),
            pep_id: sea_orm::ActiveValue::Set(b.pep_id),
            environment: sea_orm::ActiveValue::Set(b.environment.to_string()),
            version: sea_orm::ActiveValue::Set(b.version.clone()),
            source_policy_ids: sea_orm::ActiveValue::Set(serde_json::to_value(&b.source_policy_ids).unwrap_or_default()),
            data_manifest: sea_orm::ActiveValue::Set(serde_json::to_value(&b.data_manifest).unwrap_or_default()),
            checksum: sea_orm::ActiveValue::Set(b.checksum.clone()),
            builder_timestamp: sea_orm::ActiveValue::Set(b.builder_timestamp),
        }
    }
}
