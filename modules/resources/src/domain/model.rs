use cc_security::Environment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Resource {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: Environment,
    pub kind: String,
    pub external_id: String,
    pub display_name: String,
    pub attributes: serde_json::Value,
    /// `sha256(kind | external_id | canonicalized attributes)`, hex
    /// encoded. Re-registering the same external object is idempotent:
    /// the fingerprint is this module's upsert key.
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
}

/// Computes the fingerprint a resource would have for a given kind,
/// external id and attribute set, without requiring a full [`Resource`]
/// to exist yet. Used both when registering a new resource and when
/// deciding whether an incoming registration is a duplicate.
#[must_use]
pub fn fingerprint(kind: &str, external_id: &str, attributes: &serde_json::Value) -> String {
    use sha2::{Digest, Sha256};
    let canonical = serde_json::to_string(attributes).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b"\0");
    hasher.update(external_id.as_bytes());
    hasher.update(b"\0");
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_for_identical_input() {
        let attrs = serde_json::json!({"owner": "team-a"});
        assert_eq!(fingerprint("document", "doc-1", &attrs), fingerprint("document", "doc-1", &attrs));
    }

    #[test]
    fn fingerprint_differs_when_attributes_differ() {
        let a = fingerprint("document", "doc-1", &serde_json::json!({"owner": "team-a"}));
        let b = fingerprint("document", "doc-1", &serde_json::json!({"owner": "team-b"}));
        assert_ne!(a, b);
    }
}
