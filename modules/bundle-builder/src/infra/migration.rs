use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bundles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bundles::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Bundles::PepId).uuid().not_null())
                    .col(ColumnDef::new(Bundles::Environment).string().not_null())
                    .col(ColumnDef::new(Bundles::Version).string().not_null())
                    .col(ColumnDef::new(Bundles::SourcePolicyIds).json().not_null())
                    .col(ColumnDef::new(Bundles::DataManifest).json().not_null())
                    .col(ColumnDef::new(Bundles::Checksum).string().not_null())
                    .col(ColumnDef::new(Bundles::BuilderTimestamp).timestamp_with_time_zone().not_null())
                    .primary_key(Index::create().col(Bundles::TenantId).col(Bundles::PepId))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Bundles::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum Bundles {
    Table,
    TenantId,
    PepId,
    Environment,
    Version,
    SourcePolicyIds,
    DataManifest,
    Checksum,
    BuilderTimestamp,
}
