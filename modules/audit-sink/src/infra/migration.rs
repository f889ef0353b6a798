use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AuditEntries::TenantId).uuid().not_null())
                    .col(ColumnDef::new(AuditEntries::Producer).string().not_null())
                    .col(ColumnDef::new(AuditEntries::Sequence).big_integer().not_null())
                    .col(ColumnDef::new(AuditEntries::Kind).string().not_null())
                    .col(ColumnDef::new(AuditEntries::Payload).json().not_null())
                    .col(ColumnDef::new(AuditEntries::RequestId).string().null())
                    .col(ColumnDef::new(AuditEntries::RecordedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_audit_entries_producer_sequence")
                    .table(AuditEntries::Table)
                    .col(AuditEntries::TenantId)
                    .col(AuditEntries::Producer)
                    .col(AuditEntries::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_audit_entries_tenant_recorded_at")
                    .table(AuditEntries::Table)
                    .col(AuditEntries::TenantId)
                    .col(AuditEntries::RecordedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AuditEntries::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum AuditEntries {
    Table,
    Id,
    TenantId,
    Producer,
    Sequence,
    Kind,
    Payload,
    RequestId,
    RecordedAt,
}
