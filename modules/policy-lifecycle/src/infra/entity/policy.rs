use cc_db::secure::ScopableEntity;
use sea_orm::entity::prelude::*;

use crate::domain::{DomainError, Policy, PolicyEffect, PolicyFolder, PromotionStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "policies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: String,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub source: String,
    pub target_resource_ids: Json,
    pub effect: String,
    pub folder: String,
    pub sandbox_status: String,
    pub production_status: String,
    pub promoted_from_sandbox: bool,
    pub promoted_at: Option<ChronoDateTimeUtc>,
    pub promoted_by: Option<Uuid>,
    pub sandbox_ancestor_id: Option<Uuid>,
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

impl TryFrom<Model> for Policy {
    type Error = DomainError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        fn invalid<E>(_: E) -> DomainError {
            DomainError::Database(sea_orm::DbErr::Custom("invalid enumerated column".to_owned()))
        }
        Ok(Self {
            id: m.id,
            tenant_id: m.tenant_id,
            environment: m.environment.parse().map_err(invalid)?,
            name: m.name,
            description: m.description,
            source: m.source,
            target_resource_ids: serde_json::from_value(m.target_resource_ids).map_err(|_| DomainError::Database(sea_orm::DbErr::Custom("invalid target resource set".to_owned())))?,
            effect: m.effect.parse::<PolicyEffect>().map_err(invalid)?,
            folder: m.folder.parse::<PolicyFolder>().map_err(invalid)?,
            sandbox_status: m.sandbox_status.parse::<PromotionStatus>().map_err(invalid)?,
            production_status: m.production_status.parse::<PromotionStatus>().map_err(invalid)?,
            promoted_from_sandbox: m.promoted_from_sandbox,
            promoted_at: m.promoted_at,
            promoted_by: m.promoted_by,
            sandbox_ancestor_id: m.sandbox_ancestor_id,
            created_at: m.created_at,
        })
    }
}

impl From<&Policy> for ActiveModel {
    fn from(p: &Policy) -> Self {
        Self {
            id: sea_orm::ActiveValue::Set(p.id),
            tenant_id: sea_orm::ActiveValue::Set(p.tenant_id),
            environment: sea_orm::ActiveValue::Set(p.environment.to_string()),
            name: sea_orm::ActiveValue::Set(p.name.clone()),
            description: sea_orm::ActiveValue::Set(p.description.clone()),
            source: sea_orm::ActiveValue::Set(p.source.clone()),
            target_resource_ids: sea_orm::ActiveValue::Set(serde_json::to_value(&p.target_resource_ids).unwrap_or(serde_json::Value::Array(vec![]))),
            effect: sea_orm::ActiveValue::Set(p.effect.as_str().to_owned()),
            folder: sea_orm::ActiveValue::Set(p.folder.as_str().to_owned()),
            sandbox_status: sea_orm::ActiveValue::Set(p.sandbox_status.as_str().to_owned()),
            production_status: sea_orm::ActiveValue::Set(p.production_status.as_str().to_owned()),
            promoted_from_sandbox: sea_orm::ActiveValue::Set(p.promoted_from_sandbox),
            promoted_at: sea_orm::ActiveValue::Set(p.promoted_at),
            promoted_by: sea_orm::ActiveValue::Set(p.promoted_by),
            sandbox_ancestor_id: sea_orm::ActiveValue::Set(p.sandbox_ancestor_id),
            created_at: sea_orm::ActiveValue::Set(p.created_at),
        }
    }
}
