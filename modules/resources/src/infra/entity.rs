use cc_db::secure::ScopableEntity;
use cc_security::Environment;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: String,
    pub kind: String,
    pub external_id: String,
    pub display_name: String,
    pub attributes: Json,
    #[sea_orm(unique)]
    pub fingerprint: String,
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

impl TryFrom<Model> for crate::domain::Resource {
    type Error = sea_orm::DbErr;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let environment: Environment = m
            .environment
            .parse()
            .map_err(|e: <Environment as std::str::FromStr>::Err| sea_orm::DbErr::Custom(e.to_string()))?;
        Ok(Self {
            id: m.id,
            tenant_id: m.tenant_id,
            environment,
            kind: m.kind,
            external_id: m.external_id,
            display_name: m.display_name,
            attributes: m.attributes,
            fingerprint: m.fingerprint,
            created_at: m.created_at,
        })
    }
}
