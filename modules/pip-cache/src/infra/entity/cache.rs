use sea_orm::entity::prelude::*;

use crate::domain::CachedAttribute;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pip_cached_attributes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub connection_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub attribute_path: String,
    pub value: Json,
    pub fetched_at: ChronoDateTimeUtc,
    pub ttl_seconds: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CachedAttribute {
    fn from(m: Model) -> Self {
        Self { connection_id: m.connection_id, attribute_path: m.attribute_path, value: m.value, fetched_at: m.fetched_at, ttl_seconds: m.ttl_seconds }
    }
}
