use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PipConnections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PipConnections::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PipConnections::TenantId).uuid().not_null())
                    .col(ColumnDef::new(PipConnections::Environment).string().not_null())
                    .col(ColumnDef::new(PipConnections::Kind).string().not_null())
                    .col(ColumnDef::new(PipConnections::Endpoint).string().not_null())
                    .col(ColumnDef::new(PipConnections::CredentialVaultId).uuid().not_null())
                    .col(ColumnDef::new(PipConnections::AttributeMapping).json().not_null())
                    .col(ColumnDef::new(PipConnections::SyncFrequencySeconds).big_integer().not_null())
                    .col(ColumnDef::new(PipConnections::LastSyncedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(PipConnections::Status).string().not_null())
                    .col(ColumnDef::new(PipConnections::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PipCachedAttributes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PipCachedAttributes::ConnectionId).uuid().not_null())
                    .col(ColumnDef::new(PipCachedAttributes::AttributePath).string().not_null())
                    .col(ColumnDef::new(PipCachedAttributes::Value).json().not_null())
                    .col(ColumnDef::new(PipCachedAttributes::FetchedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(PipCachedAttributes::TtlSeconds).big_integer().not_null())
                    .primary_key(
                        Index::create().col(PipCachedAttributes::ConnectionId).col(PipCachedAttributes::AttributePath),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PipCachedAttributes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(PipConnections::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum PipConnections {
    Table,
    Id,
    TenantId,
    Environment,
    Kind,
    Endpoint,
    CredentialVaultId,
    AttributeMapping,
    SyncFrequencySeconds,
    LastSyncedAt,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum PipCachedAttributes {
    Table,
    ConnectionId,
    AttributePath,
    Value,
    FetchedAt,
    TtlSeconds,
}
