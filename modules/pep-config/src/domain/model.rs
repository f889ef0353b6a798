use cc_security::Environment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailPolicy {
    FailClosed,
    FailOpen,
}

impl FailPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailPolicy::FailClosed => "fail_closed",
            FailPolicy::FailOpen => "fail_open",
        }
    }
}

impl std::str::FromStr for FailPolicy {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail_closed" => Ok(FailPolicy::FailClosed),
            "fail_open" => Ok(FailPolicy::FailOpen),
            other => Err(InvalidEnumValue(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SecurityPosture {
    Permit,
    Deny,
}

impl SecurityPosture {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityPosture::Permit => "permit",
            SecurityPosture::Deny => "deny",
        }
    }
}

impl std::str::FromStr for SecurityPosture {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permit" => Ok(SecurityPosture::Permit),
            "deny" => Ok(SecurityPosture::Deny),
            other => Err(InvalidEnumValue(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrafficMode {
    Inline,
    Mirror,
}

impl TrafficMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrafficMode::Inline => "inline",
            TrafficMode::Mirror => "mirror",
        }
    }
}

impl std::str::FromStr for TrafficMode {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(TrafficMode::Inline),
            "mirror" => Ok(TrafficMode::Mirror),
            other => Err(InvalidEnumValue(other.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid enumerated value: {0}")]
pub struct InvalidEnumValue(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    ReverseProxy,
    Sidecar,
    Mcp,
}

/// Tenant-and-environment-wide defaults. Every field here has a
/// matching nullable override on [`IndividualPepConfig`], except the
/// identity columns.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GlobalPepConfig {
    pub tenant_id: Uuid,
    pub environment: Environment,
    pub poll_interval_seconds: i32,
    pub decision_log_batch_size: i32,
    pub fail_policy: FailPolicy,
    pub default_posture: SecurityPosture,
    pub sidecar_port: i32,
    pub sidecar_traffic_mode: TrafficMode,
    pub sidecar_cpu_limit: String,
    pub sidecar_memory_limit: String,
    pub reverse_proxy_upstream_url: Option<String>,
    pub reverse_proxy_timeout_seconds: i32,
    pub reverse_proxy_public_url: Option<String>,
    pub tls_enabled: bool,
}

impl GlobalPepConfig {
    #[must_use]
    pub fn defaults(tenant_id: Uuid, environment: Environment) -> Self {
        Self {
            tenant_id,
            environment,
            poll_interval_seconds: 30,
            decision_log_batch_size: 100,
            fail_policy: FailPolicy::FailClosed,
            default_posture: SecurityPosture::Deny,
            sidecar_port: 15001,
            sidecar_traffic_mode: TrafficMode::Inline,
            sidecar_cpu_limit: "250m".to_owned(),
            sidecar_memory_limit: "256Mi".to_owned(),
            reverse_proxy_upstream_url: None,
            reverse_proxy_timeout_seconds: 30,
            reverse_proxy_public_url: None,
            tls_enabled: true,
        }
    }
}

/// Per-PEP overrides. `None` means "inherit the global value"; exactly
/// one row exists per PEP.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct IndividualPepConfig {
    pub pep_id: Uuid,
    pub poll_interval_seconds: Option<i32>,
    pub decision_log_batch_size: Option<i32>,
    pub fail_policy: Option<FailPolicy>,
    pub default_posture: Option<SecurityPosture>,
    pub sidecar_port: Option<i32>,
    pub sidecar_traffic_mode: Option<TrafficMode>,
    pub sidecar_cpu_limit: Option<String>,
    pub sidecar_memory_limit: Option<String>,
    pub reverse_proxy_upstream_url: Option<String>,
    pub reverse_proxy_timeout_seconds: Option<i32>,
    pub reverse_proxy_public_url: Option<String>,
    pub tls_enabled: Option<bool>,
}

/// What a PEP actually receives from a poll: global defaults with
/// individual overrides applied, and every key irrelevant to its
/// deployment mode dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EffectiveConfig {
    pub poll_interval_seconds: i32,
    pub decision_log_batch_size: i32,
    pub fail_policy: FailPolicy,
    pub default_posture: SecurityPosture,
    pub tls_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar_port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar_traffic_mode: Option<TrafficMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar_cpu_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar_memory_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_proxy_upstream_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_proxy_timeout_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_proxy_public_url: Option<String>,
}
