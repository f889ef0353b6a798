use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Resources::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Resources::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Resources::Environment).string().not_null())
                    .col(ColumnDef::new(Resources::Kind).string().not_null())
                    .col(ColumnDef::new(Resources::ExternalId).string().not_null())
                    .col(ColumnDef::new(Resources::DisplayName).string().not_null())
                    .col(ColumnDef::new(Resources::Attributes).json().not_null())
                    .col(ColumnDef::new(Resources::Fingerprint).string().not_null().unique_key())
                    .col(ColumnDef::new(Resources::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_resources_tenant_kind")
                    .table(Resources::Table)
                    .col(Resources::TenantId)
                    .col(Resources::Kind)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Resources::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum Resources {
    Table,
    Id,
    TenantId,
    Environment,
    Kind,
    ExternalId,
    DisplayName,
    Attributes,
    Fingerprint,
    CreatedAt,
}
