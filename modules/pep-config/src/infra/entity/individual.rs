use sea_orm::entity::prelude::*;

use crate::domain::{DomainError, FailPolicy, IndividualPepConfig, SecurityPosture, TrafficMode};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "individual_pep_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pep_id: Uuid,
    pub poll_interval_seconds: Option<i32>,
    pub decision_log_batch_size: Option<i32>,
    pub fail_policy: Option<String>,
    pub default_posture: Option<String>,
    pub sidecar_port: Option<i32>,
    pub sidecar_traffic_mode: Option<String>,
    pub sidecar_cpu_limit: Option<String>,
    pub sidecar_memory_limit: Option<String>,
    pub reverse_proxy_upstream_url: Option<String>,
    pub reverse_proxy_timeout_seconds: Option<i32>,
    pub reverse_proxy_public_url: Option<String>,
    pub tls_enabled: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for IndividualPepConfig {
    type Error = DomainError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        fn invalid<E>(_: E) -> DomainError {
            DomainError::Database(sea_orm::DbErr::Custom("invalid enumerated column".to_owned()))
        }
        Ok(Self {
            pep_id: m.pep_id,
            poll_interval_seconds: m.poll_interval_seconds,
            decision_log_batch_size: m.decision_log_batch_size,
            fail_policy: m.fail_policy.map(|v| v.parse::<FailPolicy>()).transpose().map_err(invalid)?,
            default_posture: m.default_posture.map(|v| v.parse::<SecurityPosture>()).transpose().map_err(invalid)?,
            sidecar_port: m.sidecar_port,
            sidecar_traffic_mode: m.sidecar_traffic_mode.map(|v| v.parse::<TrafficMode>()).transpose().map_err(invalid)?,
            sidecar_cpu_limit: m.sidecar_cpu_limit,
            sidecar_memory_limit: m.sidecar_memory_limit,
            reverse_proxy_upstream_url: m.reverse_proxy_upstream_url,
            reverse_proxy_timeout_seconds: m.reverse_proxy_timeout_seconds,
            reverse_proxy_public_url: m.reverse_proxy_public_url,
            tls_enabled: m.tls_enabled,
        })
    }
}

impl From<&IndividualPepConfig> for ActiveModel {
    fn from(c: &IndividualPepConfig) -> Self {
        Self {
            pep_id: sea_orm::ActiveValue::Set(c.pep_id),
            poll_interval_seconds: sea_orm::ActiveValue::Set(c.poll_interval_seconds),
            decision_log_batch_size: sea_orm::ActiveValue::Set(c.decision_log_batch_size),
            fail_policy: sea_orm::ActiveValue::Set(c.fail_policy.map(|v| v.as_str().to_owned())),
            default_posture: sea_orm::ActiveValue::Set(c.default_posture.map(|v| v.as_str().to_owned())),
            sidecar_port: sea_orm::ActiveValue::Set(c.sidecar_port),
            sidecar_traffic_mode: sea_orm::ActiveValue::Set(c.sidecar_traffic_mode.map(|v| v.as_str().to_owned())),
            sidecar_cpu_limit: sea_orm::ActiveValue::Set(c.sidecar_cpu_limit.clone()),
            sidecar_memory_limit: sea_orm::ActiveValue::Set(c.sidecar_memory_limit.clone()),
            reverse_proxy_upstream_url: sea_orm::ActiveValue::Set(c.reverse_proxy_upstream_url.clone()),
            reverse_proxy_timeout_seconds: sea_orm::ActiveValue::Set(c.reverse_proxy_timeout_seconds),
            reverse_proxy_public_url: sea_orm::ActiveValue::Set(c.reverse_proxy_public_url.clone()),
            tls_enabled: sea_orm::ActiveValue::Set(c.tls_enabled),
        }
    }
}
