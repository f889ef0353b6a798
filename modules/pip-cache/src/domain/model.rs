use cc_security::Environment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    HttpApi,
    Database,
    Git,
    IdentityProvider,
    Hris,
    Crm,
}

impl ConnectionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionKind::HttpApi => "http_api",
            ConnectionKind::Database => "database",
            ConnectionKind::Git => "git",
            ConnectionKind::IdentityProvider => "identity_provider",
            ConnectionKind::Hris => "hris",
            ConnectionKind::Crm => "crm",
        }
    }
}

impl std::str::FromStr for ConnectionKind {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http_api" => Ok(ConnectionKind::HttpApi),
            "database" => Ok(ConnectionKind::Database),
            "git" => Ok(ConnectionKind::Git),
            "identity_provider" => Ok(ConnectionKind::IdentityProvider),
            "hris" => Ok(ConnectionKind::Hris),
            "crm" => Ok(ConnectionKind::Crm),
            other => Err(DomainParseError(other.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown connection kind: {0}")]
pub struct DomainParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Active,
    Degraded,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PipConnection {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: Environment,
    pub kind: ConnectionKind,
    pub endpoint: String,
    pub credential_vault_id: Uuid,
    pub attribute_mapping: serde_json::Value,
    pub sync_frequency_seconds: i64,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CachedAttribute {
    pub connection_id: Uuid,
    pub attribute_path: String,
    pub value: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
    pub ttl_seconds: i64,
}

impl CachedAttribute {
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        Utc::now().signed_duration_since(self.fetched_at) < chrono::Duration::seconds(self.ttl_seconds)
    }
}

/// Result of a `lookup`, distinguishing a fresh hit from a fetch
/// failure papered over with a stale value, per the cache's
/// fail-soft contract.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Fresh(serde_json::Value),
    Stale(serde_json::Value),
    Missing,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fresh_attribute_is_fresh_until_its_ttl_elapses() {
        let attribute = CachedAttribute {
            connection_id: Uuid::new_v4(),
            attribute_path: "department".to_owned(),
            value: serde_json::json!("engineering"),
            fetched_at: Utc::now(),
            ttl_seconds: 60,
        };
        assert!(attribute.is_fresh());
    }

    #[test]
    fn expired_attribute_is_not_fresh() {
        let attribute = CachedAttribute {
            connection_id: Uuid::new_v4(),
            attribute_path: "department".to_owned(),
            value: serde_json::json!("engineering"),
            fetched_at: Utc::now() - chrono::Duration::seconds(120),
            ttl_seconds: 60,
        };
        assert!(!attribute.is_fresh());
    }

    #[test]
    fn connection_kind_round_trips_through_its_wire_representation() {
        for kind in [
            ConnectionKind::HttpApi,
            ConnectionKind::Database,
            ConnectionKind::Git,
            ConnectionKind::IdentityProvider,
            ConnectionKind::Hris,
            ConnectionKind::Crm,
        ] {
            assert_eq!(kind.as_str().parse::<ConnectionKind>().unwrap(), kind);
        }
    }
}
