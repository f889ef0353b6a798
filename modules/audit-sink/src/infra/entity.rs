use cc_db::secure::ScopableEntity;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub producer: String,
    pub sequence: i64,
    pub kind: String,
    pub payload: Json,
    pub request_id: Option<String>,
    pub recorded_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ScopableEntity for Entity {
    fn tenant_column() -> Self::Column {
        Column::TenantId
    }
}

impl From<Model> for crate::domain::AuditEntry {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            tenant_id: m.tenant_id,
            producer: m.producer,
            sequence: m.sequence,
            kind: m.kind,
            payload: m.payload,
            request_id: m.request_id,
            recorded_at: m.recorded_at,
        }
    }
}

impl From<&crate::domain::AuditEntry> for ActiveModel {
    fn from(e: &crate::domain::AuditEntry) -> Self {
        Self {
            id: sea_orm::ActiveValue::Set(e.id),
            tenant_id: sea_orm::ActiveValue::Set(e.tenant_id),
            producer: sea_orm::ActiveValue::Set(e.producer.clone()),
            sequence: sea_orm::ActiveValue::Set(e.sequence),
            kind: sea_orm::ActiveValue::Set(e.kind.clone()),
            payload: sea_orm::ActiveValue::Set(e.payload.clone()),
            request_id: sea_orm::ActiveValue::Set(e.request_id.clone()),
            recorded_at: sea_orm::ActiveValue::Set(e.recorded_at),
        }
    }
}
