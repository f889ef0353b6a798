use cc_security::Environment;
use policy_lifecycle::domain::Policy;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::model::{Bundle, DataManifestEntry};

/// Pure assembly step: given the enabled module set and data manifest
/// for a tenant/environment, produces the bundle a PEP would load.
/// Deterministic in the policy source and manifest contents only —
/// never reads a clock beyond stamping `builder_timestamp`, so the
/// `version`/`checksum` pair is reproducible across builder instances.
#[must_use]
pub fn build_bundle(
    tenant_id: Uuid,
    pep_id: Uuid,
    environment: Environment,
    mut policies: Vec<Policy>,
    mut data_manifest: Vec<DataManifestEntry>,
    now: chrono::DateTime<chrono::Utc>,
) -> Bundle {
    policies.sort_by(|a, b| a.id.cmp(&b.id));
    data_manifest.sort_by(|a, b| a.connection_id.cmp(&b.connection_id));

    let mut module_hasher = Sha256::new();
    for policy in &policies {
        module_hasher.update(policy.id.as_bytes());
        module_hasher.update(policy.source.as_bytes());
        module_hasher.update([0u8]);
    }
    for entry in &data_manifest {
        module_hasher.update(entry.connection_id.as_bytes());
        module_hasher.update(entry.ttl_seconds.to_be_bytes());
    }
    let version = hex::encode(module_hasher.finalize());

    let source_policy_ids: Vec<Uuid> = policies.iter().map(|p| p.id).collect();

    let mut checksum_hasher = Sha256::new();
    checksum_hasher.update(version.as_bytes());
    for id in &source_policy_ids {
        checksum_hasher.update(id.as_bytes());
    }
    for entry in &data_manifest {
        checksum_hasher.update(entry.connection_id.as_bytes());
        checksum_hasher.update(entry.ttl_seconds.to_be_bytes());
    }
    let checksum = hex::encode(checksum_hasher.finalize());

    Bundle { tenant_id, pep_id, environment, version, source_policy_ids, data_manifest, checksum, builder_timestamp: now, signature: None }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use policy_lifecycle::domain::PolicyEffect;
    use uuid::Uuid;

    use super::*;

    fn policy(id: Uuid, source: &str) -> Policy {
        let mut p = Policy::draft(Uuid::new_v4(), Environment::Sandbox, "p".to_owned(), String::new(), source.to_owned(), vec![], PolicyEffect::Deny);
        p.id = id;
        p
    }

    #[test]
    fn identical_inputs_yield_byte_identical_versions() {
        let now = chrono::Utc::now();
        let id = Uuid::new_v4();
        let tenant = Uuid::new_v4();
        let pep = Uuid::new_v4();
        let a = build_bundle(tenant, pep, Environment::Sandbox, vec![policy(id, "package p\n")], vec![], now);
        let b = build_bundle(tenant, pep, Environment::Sandbox, vec![policy(id, "package p\n")], vec![], now);
        assert_eq!(a.version, b.version);
        assert_eq!(a.checksum, b.checksum);
    }

    #[test]
    fn version_is_independent_of_input_module_order() {
        let now = chrono::Utc::now();
        let tenant = Uuid::new_v4();
        let pep = Uuid::new_v4();
        let one = policy(Uuid::new_v4(), "package one\n");
        let two = policy(Uuid::new_v4(), "package two\n");
        let forward = build_bundle(tenant, pep, Environment::Sandbox, vec![one.clone(), two.clone()], vec![], now);
        let reversed = build_bundle(tenant, pep, Environment::Sandbox, vec![two, one], vec![], now);
        assert_eq!(forward.version, reversed.version);
    }

    #[test]
    fn version_changes_when_a_policy_source_changes() {
        let now = chrono::Utc::now();
        let tenant = Uuid::new_v4();
        let pep = Uuid::new_v4();
        let id = Uuid::new_v4();
        let a = build_bundle(tenant, pep, Environment::Sandbox, vec![policy(id, "package p\n")], vec![], now);
        let b = build_bundle(tenant, pep, Environment::Sandbox, vec![policy(id, "package p\nallow = true\n")], vec![], now);
        assert_ne!(a.version, b.version);
    }

    #[test]
    fn checksum_differs_from_version() {
        let now = chrono::Utc::now();
        let bundle = build_bundle(Uuid::new_v4(), Uuid::new_v4(), Environment::Sandbox, vec![policy(Uuid::new_v4(), "package p\n")], vec![], now);
        assert_ne!(bundle.version, bundle.checksum);
    }
}
