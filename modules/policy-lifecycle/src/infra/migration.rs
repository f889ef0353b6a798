use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Policies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Policies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Policies::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Policies::Environment).string().not_null())
                    .col(ColumnDef::new(Policies::Name).string().not_null())
                    .col(ColumnDef::new(Policies::Description).string().not_null())
                    .col(ColumnDef::new(Policies::Source).text().not_null())
                    .col(ColumnDef::new(Policies::TargetResourceIds).json().not_null())
                    .col(ColumnDef::new(Policies::Effect).string().not_null())
                    .col(ColumnDef::new(Policies::Folder).string().not_null())
                    .col(ColumnDef::new(Policies::SandboxStatus).string().not_null())
                    .col(ColumnDef::new(Policies::ProductionStatus).string().not_null())
                    .col(ColumnDef::new(Policies::PromotedFromSandbox).boolean().not_null())
                    .col(ColumnDef::new(Policies::PromotedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Policies::PromotedBy).uuid().null())
                    .col(ColumnDef::new(Policies::SandboxAncestorId).uuid().null())
                    .col(ColumnDef::new(Policies::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_policies_tenant_environment_folder")
                    .table(Policies::Table)
                    .col(Policies::TenantId)
                    .col(Policies::Environment)
                    .col(Policies::Folder)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Policies::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum Policies {
    Table,
    Id,
    TenantId,
    Environment,
    Name,
    Description,
    Source,
    TargetResourceIds,
    Effect,
    Folder,
    SandboxStatus,
    ProductionStatus,
    PromotedFromSandbox,
    PromotedAt,
    PromotedBy,
    SandboxAncestorId,
    CreatedAt,
}
