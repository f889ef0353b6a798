use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Peps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Peps::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Peps::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Peps::Environment).string().not_null())
                    .col(ColumnDef::new(Peps::ExternalId).string().not_null())
                    .col(ColumnDef::new(Peps::Mode).string().not_null())
                    .col(ColumnDef::new(Peps::Metadata).json().not_null())
                    .col(ColumnDef::new(Peps::RegistrationTokenHash).string().not_null())
                    .col(ColumnDef::new(Peps::LastSeenAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Peps::Health).string().not_null())
                    .col(ColumnDef::new(Peps::RegisteredAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_peps_identity")
                    .table(Peps::Table)
                    .col(Peps::TenantId)
                    .col(Peps::Environment)
                    .col(Peps::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Peps::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum Peps {
    Table,
    Id,
    TenantId,
    Environment,
    ExternalId,
    Mode,
    Metadata,
    RegistrationTokenHash,
    LastSeenAt,
    Health,
    RegisteredAt,
}
