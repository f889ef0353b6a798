use cc_security::Environment;
use chrono::{DateTime, Utc};
use pep_config::domain::DeploymentMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PepHealth {
    Healthy,
    Unhealthy,
}

impl PepHealth {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PepHealth::Healthy => "healthy",
            PepHealth::Unhealthy => "unhealthy",
        }
    }
}

impl std::str::FromStr for PepHealth {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "healthy" => Ok(PepHealth::Healthy),
            "unhealthy" => Ok(PepHealth::Unhealthy),
            other => Err(InvalidEnumValue(other.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid enum value: {0}")]
pub struct InvalidEnumValue(String);

/// A registered policy enforcement point. `external_id` is the
/// caller-supplied identifier `register` is idempotent on — a pod
/// name, a sidecar instance id, whatever the deploying operator finds
/// stable across restarts. Never carries the registration token: that
/// is minted once, returned to the caller, and never stored in the
/// clear (see [`crate::domain::token`]).
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Pep {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: Environment,
    pub external_id: String,
    pub mode: DeploymentMode,
    pub metadata: Value,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub health: PepHealth,
    pub registered_at: DateTime<Utc>,
}

/// Returned once, at registration time, and never again — a later
/// `GET /peps/{id}` exposes [`Pep`] only.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Registration {
    pub pep: Pep,
    pub registration_token: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub environment: Environment,
    pub mode: DeploymentMode,
    pub external_id: String,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct HeartbeatRequest {
    pub registration_token: String,
    #[serde(default)]
    pub self_report: Value,
}

/// What a PEP gets back from a poll: its merged configuration plus the
/// bundle version it should be running. The PEP compares this version
/// against its cached copy and only calls `fetch_bundle` when they
/// differ.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PollResponse {
    pub effective_config: pep_config::domain::EffectiveConfig,
    pub bundle_version: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct FetchBundleQuery {
    pub registration_token: String,
    /// The version the PEP already holds, so the coordinator can
    /// signal `not-modified` instead of re-sending an unchanged bundle.
    #[serde(default)]
    pub known_version: Option<String>,
}
