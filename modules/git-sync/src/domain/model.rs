use cc_security::Environment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    GitWins,
    ControlPlaneWins,
}

impl ConflictPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictPolicy::GitWins => "git_wins",
            ConflictPolicy::ControlPlaneWins => "control_plane_wins",
        }
    }
}

impl std::str::FromStr for ConflictPolicy {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git_wins" => Ok(ConflictPolicy::GitWins),
            "control_plane_wins" => Ok(ConflictPolicy::ControlPlaneWins),
            other => Err(InvalidEnumValue(other.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid enum value: {0}")]
pub struct InvalidEnumValue(String);

/// Per-tenant Git remote configuration. `credential_vault_id` points at
/// a personal-access-token-shaped secret in `credential-vault`; this
/// module never holds the raw token beyond the call that resolves it.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GitConfig {
    pub tenant_id: Uuid,
    pub remote_url: String,
    pub branch: String,
    pub credential_vault_id: Uuid,
    pub auto_sync_interval_seconds: i64,
    pub conflict_policy: ConflictPolicy,
    pub last_pull_at: Option<DateTime<Utc>>,
    pub last_pull_status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    Push,
    Pull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Success,
    Failed,
}

/// One row per file touched by a push or pull, giving the operator the
/// per-file sync history the spec requires.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SyncRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: Environment,
    pub policy_id: Uuid,
    pub direction: SyncDirection,
    pub status: SyncStatus,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Request body for `PUT /settings/git-config`. The token is accepted
/// once here and handed straight to the credential vault; it is never
/// echoed back by a subsequent `GET`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GitConfigRequest {
    pub remote_url: String,
    pub branch: String,
    pub access_token: String,
    pub auto_sync_interval_seconds: i64,
    pub conflict_policy: ConflictPolicy,
}

/// Response body for `GET`/`PUT /settings/git-config`: every
/// non-secret field round-trips; the credential is represented only as
/// a presence flag, never its value.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct GitConfigResponse {
    pub remote_url: String,
    pub branch: String,
    pub credential_configured: bool,
    pub auto_sync_interval_seconds: i64,
    pub conflict_policy: ConflictPolicy,
    pub last_pull_at: Option<DateTime<Utc>>,
    pub last_pull_status: Option<String>,
}

impl From<GitConfig> for GitConfigResponse {
    fn from(c: GitConfig) -> Self {
        Self {
            remote_url: c.remote_url,
            branch: c.branch,
            credential_configured: true,
            auto_sync_interval_seconds: c.auto_sync_interval_seconds,
            conflict_policy: c.conflict_policy,
            last_pull_at: c.last_pull_at,
            last_pull_status: c.last_pull_status,
        }
    }
}
