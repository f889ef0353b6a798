use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VaultEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VaultEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(VaultEntries::TenantId).uuid().not_null())
                    .col(ColumnDef::new(VaultEntries::Label).string().not_null())
                    .col(ColumnDef::new(VaultEntries::Nonce).binary().not_null())
                    .col(ColumnDef::new(VaultEntries::Ciphertext).binary().not_null())
                    .col(ColumnDef::new(VaultEntries::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(VaultEntries::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum VaultEntries {
    Table,
    Id,
    TenantId,
    Label,
    Nonce,
    Ciphertext,
    CreatedAt,
}
