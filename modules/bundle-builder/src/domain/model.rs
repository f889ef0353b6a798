use cc_security::Environment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One PIP collection a bundle's policies may consult during
/// evaluation, with a TTL hint copied from the connection's own sync
/// frequency at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DataManifestEntry {
    pub connection_id: Uuid,
    pub ttl_seconds: i64,
}

/// Reserved for a future version; see the signing Open Question.
/// Never populated.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BundleSignature {
    pub algorithm: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Bundle {
    pub tenant_id: Uuid,
    pub pep_id: Uuid,
    pub environment: Environment,
    /// Hex `sha256` over the sorted, canonicalized module set plus
    /// manifest. Reproducible: identical inputs always yield an
    /// identical version, on any builder instance.
    pub version: String,
    pub source_policy_ids: Vec<Uuid>,
    pub data_manifest: Vec<DataManifestEntry>,
    /// Integrity checksum a PEP verifies before loading the bundle,
    /// distinct from `version` so a transport corruption is caught
    /// even if two different builds happen to share a version.
    pub checksum: String,
    pub builder_timestamp: DateTime<Utc>,
    pub signature: Option<BundleSignature>,
}
