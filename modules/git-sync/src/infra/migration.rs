use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GitConfig::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GitConfig::TenantId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GitConfig::RemoteUrl).string().not_null())
                    .col(ColumnDef::new(GitConfig::Branch).string().not_null())
                    .col(ColumnDef::new(GitConfig::CredentialVaultId).uuid().not_null())
                    .col(ColumnDef::new(GitConfig::AutoSyncIntervalSeconds).big_integer().not_null())
                    .col(ColumnDef::new(GitConfig::ConflictPolicy).string().not_null())
                    .col(ColumnDef::new(GitConfig::LastPullAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(GitConfig::LastPullStatus).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GitSyncRecord::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GitSyncRecord::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GitSyncRecord::TenantId).uuid().not_null())
                    .col(ColumnDef::new(GitSyncRecord::Environment).string().not_null())
                    .col(ColumnDef::new(GitSyncRecord::PolicyId).uuid().not_null())
                    .col(ColumnDef::new(GitSyncRecord::Direction).string().not_null())
                    .col(ColumnDef::new(GitSyncRecord::Status).string().not_null())
                    .col(ColumnDef::new(GitSyncRecord::Message).string().not_null())
                    .col(ColumnDef::new(GitSyncRecord::OccurredAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_git_sync_record_tenant_occurred")
                    .table(GitSyncRecord::Table)
                    .col(GitSyncRecord::TenantId)
                    .col(GitSyncRecord::OccurredAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GitSyncRecord::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(GitConfig::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum GitConfig {
    Table,
    TenantId,
    RemoteUrl,
    Branch,
    CredentialVaultId,
    AutoSyncIntervalSeconds,
    ConflictPolicy,
    LastPullAt,
    LastPullStatus,
}

#[derive(Iden)]
enum GitSyncRecord {
    Table,
    Id,
    TenantId,
    Environment,
    PolicyId,
    Direction,
    Status,
    Message,
    OccurredAt,
}
