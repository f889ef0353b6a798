use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GlobalPepConfig::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GlobalPepConfig::TenantId).uuid().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::Environment).string().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::PollIntervalSeconds).integer().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::DecisionLogBatchSize).integer().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::FailPolicy).string().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::DefaultPosture).string().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::SidecarPort).integer().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::SidecarTrafficMode).string().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::SidecarCpuLimit).string().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::SidecarMemoryLimit).string().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::ReverseProxyUpstreamUrl).string().null())
                    .col(ColumnDef::new(GlobalPepConfig::ReverseProxyTimeoutSeconds).integer().not_null())
                    .col(ColumnDef::new(GlobalPepConfig::ReverseProxyPublicUrl).string().null())
                    .col(ColumnDef::new(GlobalPepConfig::TlsEnabled).boolean().not_null())
                    .primary_key(Index::create().col(GlobalPepConfig::TenantId).col(GlobalPepConfig::Environment))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IndividualPepConfig::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IndividualPepConfig::PepId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(IndividualPepConfig::PollIntervalSeconds).integer().null())
                    .col(ColumnDef::new(IndividualPepConfig::DecisionLogBatchSize).integer().null())
                    .col(ColumnDef::new(IndividualPepConfig::FailPolicy).string().null())
                    .col(ColumnDef::new(IndividualPepConfig::DefaultPosture).string().null())
                    .col(ColumnDef::new(IndividualPepConfig::SidecarPort).integer().null())
                    .col(ColumnDef::new(IndividualPepConfig::SidecarTrafficMode).string().null())
                    .col(ColumnDef::new(IndividualPepConfig::SidecarCpuLimit).string().null())
                    .col(ColumnDef::new(IndividualPepConfig::SidecarMemoryLimit).string().null())
                    .col(ColumnDef::new(IndividualPepConfig::ReverseProxyUpstreamUrl).string().null())
                    .col(ColumnDef::new(IndividualPepConfig::ReverseProxyTimeoutSeconds).integer().null())
                    .col(ColumnDef::new(IndividualPepConfig::ReverseProxyPublicUrl).string().null())
                    .col(ColumnDef::new(IndividualPepConfig::TlsEnabled).boolean().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(IndividualPepConfig::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(GlobalPepConfig::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum GlobalPepConfig {
    Table,
    TenantId,
    Environment,
    PollIntervalSeconds,
    DecisionLogBatchSize,
    FailPolicy,
    DefaultPosture,
    SidecarPort,
    SidecarTrafficMode,
    SidecarCpuLimit,
    SidecarMemoryLimit,
    ReverseProxyUpstreamUrl,
    ReverseProxyTimeoutSeconds,
    ReverseProxyPublicUrl,
    TlsEnabled,
}

#[derive(Iden)]
enum IndividualPepConfig {
    Table,
    PepId,
    PollIntervalSeconds,
    DecisionLogBatchSize,
    FailPolicy,
    DefaultPosture,
    SidecarPort,
    SidecarTrafficMode,
    SidecarCpuLimit,
    SidecarMemoryLimit,
    ReverseProxyUpstreamUrl,
    ReverseProxyTimeoutSeconds,
    ReverseProxyPublicUrl,
    TlsEnabled,
}
