use std::sync::Arc;

use cc_modkit::ClientHub;
use cc_security::{AccessScope, Environment};
use dashmap::DashMap;
use pip_cache::PipCacheClient;
use policy_lifecycle::PolicyLifecycleClient;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use super::builder::build_bundle;
use super::error::DomainError;
use super::model::{Bundle, DataManifestEntry};
use crate::infra::repository::Repository;

const TRIGGER_CHANNEL_CAPACITY: usize = 256;
const WORKER_POOL_SIZE: usize = 4;

/// A build-trigger event fanned in from policy create/update/promote/
/// retire. Bundle contents are tenant-wide (see the grounding ledger's
/// assignment-granularity note), so a trigger only needs to name the
/// tenant whose bundles went stale, not a specific PEP; each cached
/// bundle already knows its own environment.
struct StaleTrigger {
    tenant_id: Uuid,
}

type BundleCache = DashMap<(Uuid, Uuid), Bundle>;

/// Builds and serves content-addressed policy bundles. `get_or_build`
/// never blocks on a rebuild it can avoid: it serves a cached bundle
/// first, falls back to the last durable version, and only runs the
/// assembly step when neither exists. Invalidation is asynchronous,
/// handled by a bounded worker pool fed by `trigger_rebuild`.
#[derive(Clone)]
pub struct Service {
    repository: Repository,
    client_hub: Arc<ClientHub>,
    trigger: mpsc::Sender<StaleTrigger>,
    cache: Arc<BundleCache>,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository, client_hub: Arc<ClientHub>) -> Self {
        let (trigger, receiver) = mpsc::channel(TRIGGER_CHANNEL_CAPACITY);
        let receiver = Arc::new(Mutex::new(receiver));
        let cache: Arc<BundleCache> = Arc::new(DashMap::new());

        for _ in 0..WORKER_POOL_SIZE {
            tokio::spawn(run_worker(repository.clone(), client_hub.clone(), cache.clone(), receiver.clone()));
        }

        Self { repository, client_hub, trigger, cache }
    }

    #[tracing::instrument(skip(self, scope))]
    pub async fn get_or_build(&self, scope: &AccessScope, pep_id: Uuid, environment: Environment) -> Result<Bundle, DomainError> {
        let tenant_id = scope.tenant_id().unwrap_or_else(Uuid::nil);
        if let Some(bundle) = self.cache.get(&(tenant_id, pep_id)) {
            return Ok(bundle.clone());
        }
        if let Some(bundle) = self.repository.get_latest(scope, pep_id).await? {
            self.cache.insert((tenant_id, pep_id), bundle.clone());
            return Ok(bundle);
        }
        rebuild(&self.repository, &self.client_hub, &self.cache, scope, tenant_id, pep_id, environment).await
    }

    /// Best-effort: the caller does not wait for the rebuild. A
    /// bounded channel is used so a burst of policy edits cannot
    /// unboundedly queue work; a full channel drops the trigger by
    /// simply declining the send, since a later trigger for the same
    /// tenant makes an earlier one redundant anyway.
    pub async fn trigger_rebuild(&self, tenant_id: Uuid) {
        let _ = self.trigger.send(StaleTrigger { tenant_id }).await;
    }
}

async fn run_worker(repository: Repository, client_hub: Arc<ClientHub>, cache: Arc<BundleCache>, receiver: Arc<Mutex<mpsc::Receiver<StaleTrigger>>>) {
    loop {
        let trigger = {
            let mut receiver = receiver.lock().await;
            receiver.recv().await
        };
        let Some(trigger) = trigger else {
            return;
        };

        let stale: Vec<(Uuid, Environment)> = cache.iter().filter(|e| e.key().0 == trigger.tenant_id).map(|e| (e.key().1, e.value().environment)).collect();
        for (pep_id, environment) in stale {
            let scope = AccessScope::for_tenant(trigger.tenant_id, environment);
            match rebuild(&repository, &client_hub, &cache, &scope, trigger.tenant_id, pep_id, environment).await {
                Ok(_) => {}
                Err(error) => tracing::warn!(%error, tenant_id = %trigger.tenant_id, %pep_id, "bundle rebuild failed"),
            }
        }
    }
}

async fn rebuild(
    repository: &Repository,
    client_hub: &Arc<ClientHub>,
    cache: &BundleCache,
    scope: &AccessScope,
    tenant_id: Uuid,
    pep_id: Uuid,
    environment: Environment,
) -> Result<Bundle, DomainError> {
    let policy_client = client_hub.get::<dyn PolicyLifecycleClient>().map_err(|_| DomainError::PolicyLifecycleUnavailable)?;
    let policies = policy_client.list_enabled(scope).await.map_err(|_| DomainError::PolicyLifecycleUnavailable)?;
    let manifest = data_manifest(client_hub, scope).await;

    let bundle = build_bundle(tenant_id, pep_id, environment, policies, manifest, chrono::Utc::now());
    repository.upsert(&bundle).await?;
    cache.insert((tenant_id, pep_id), bundle.clone());
    Ok(bundle)
}

/// The PIP cache may not have started yet, or a tenant may simply have
/// no connections configured; either way an empty manifest is valid,
/// not an error — a bundle with no external data dependencies is
/// normal for a policy set with no PIP-backed attributes.
async fn data_manifest(client_hub: &Arc<ClientHub>, scope: &AccessScope) -> Vec<DataManifestEntry> {
    let Ok(pip_client) = client_hub.get::<dyn PipCacheClient>() else {
        return Vec::new();
    };
    pip_client
        .list_connections(scope)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|c| DataManifestEntry { connection_id: c.id, ttl_seconds: c.sync_frequency_seconds })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    #[tokio::test]
    async fn get_or_build_returns_not_found_style_error_when_policy_lifecycle_is_unavailable() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results::<crate::infra::entity::bundle::Model, _, _>([vec![]]).into_connection();
        let repository = Repository::new(cc_db::DbConn::from_connection(db));
        let service = Service::new(repository, Arc::new(ClientHub::new()));
        let scope = AccessScope::for_tenant(Uuid::new_v4(), Environment::Sandbox);

        let error = service.get_or_build(&scope, Uuid::new_v4(), Environment::Sandbox).await.unwrap_err();
        assert!(matches!(error, DomainError::PolicyLifecycleUnavailable));
    }
}
