use cc_db::DbConn;
use cc_db::secure::apply_scope;
use cc_security::AccessScope;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::{DomainError, GlobalPepConfig, IndividualPepConfig};
use crate::infra::entity::{global, individual};

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Every tenant/environment pair has exactly one global config row;
    /// a miss means it was never seeded, so defaults are created and
    /// persisted rather than treated as an error.
    pub async fn get_or_create_global(&self, scope: &AccessScope) -> Result<GlobalPepConfig, DomainError> {
        let tenant_id = scope.tenant_id().ok_or(DomainError::GlobalNotFound { tenant_id: Uuid::nil() })?;
        let environment = scope.environment().ok_or(DomainError::GlobalNotFound { tenant_id })?;

        let existing = apply_scope(global::Entity::find(), scope)
            .filter(global::Column::Environment.eq(environment.to_string()))
            .one(self.db.inner())
            .await?;

        if let Some(model) = existing {
            return model.try_into();
        }

        let defaults = GlobalPepConfig::defaults(tenant_id, environment);
        global::Entity::insert(global::ActiveModel::from(&defaults))
            .on_conflict(OnConflict::columns([global::Column::TenantId, global::Column::Environment]).do_nothing().to_owned())
            .exec(self.db.inner())
            .await?;
        Ok(defaults)
    }

    pub async fn put_global(&self, scope: &AccessScope, config: GlobalPepConfig) -> Result<GlobalPepConfig, DomainError> {
        let _ = scope;
        let model = global::ActiveModel::from(&config);
        global::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([global::Column::TenantId, global::Column::Environment])
                    .update_columns([
                        global::Column::PollIntervalSeconds,
                        global::Column::DecisionLogBatchSize,
                        global::Column::FailPolicy,
                        global::Column::DefaultPosture,
                        global::Column::SidecarPort,
                        global::Column::SidecarTrafficMode,
                        global::Column::SidecarCpuLimit,
                        global::Column::SidecarMemoryLimit,
                        global::Column::ReverseProxyUpstreamUrl,
                        global::Column::ReverseProxyTimeoutSeconds,
                        global::Column::ReverseProxyPublicUrl,
                        global::Column::TlsEnabled,
                    ])
                    .to_owned(),
            )
            .exec(self.db.inner())
            .await?;
        Ok(config)
    }

    pub async fn get_individual(&self, pep_id: Uuid) -> Result<Option<IndividualPepConfig>, DomainError> {
        let model = individual::Entity::find_by_id(pep_id).one(self.db.inner()).await?;
        model.map(TryInto::try_into).transpose()
    }

    pub async fn put_individual(&self, config: IndividualPepConfig) -> Result<IndividualPepConfig, DomainError> {
        let model = individual::ActiveModel::from(&config);
        individual::Entity::insert(model)
            .on_conflict(
                OnConflict::column(individual::Column::PepId)
                    .update_columns([
                        individual::Column::PollIntervalSeconds,
                        individual::Column::DecisionLogBatchSize,
                        individual::Column::FailPolicy,
                        individual::Column::DefaultPosture,
                        individual::Column::SidecarPort,
                        individual::Column::SidecarTrafficMode,
                        individual::Column::SidecarCpuLimit,
                        individual::Column::SidecarMemoryLimit,
                        individual::Column::ReverseProxyUpstreamUrl,
                        individual::Column::ReverseProxyTimeoutSeconds,
                        individual::Column::ReverseProxyPublicUrl,
                        individual::Column::TlsEnabled,
                    ])
                    .to_owned(),
            )
            .exec(self.db.inner())
            .await?;
        Ok(config)
    }
}
