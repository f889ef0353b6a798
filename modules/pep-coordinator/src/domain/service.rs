use std::sync::Arc;
use std::time::Duration;

use bundle_builder::BundleBuilderClient;
use cc_modkit::ClientHub;
use cc_security::AccessScope;
use pep_config::PepConfigClient;
use uuid::Uuid;

use super::error::DomainError;
use super::model::{FetchBundleQuery, HeartbeatRequest, Pep, PepHealth, PollResponse, RegisterRequest, Registration};
use super::token;
use crate::infra::repository::Repository;

const STALENESS_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// `fetch_bundle`'s result: either the PEP's cached version is still
/// current, or a fresh bundle to load.
pub enum BundleFetchOutcome {
    NotModified,
    Bundle(bundle_builder::domain::Bundle),
}

/// Owns PEP identity and the polling contract. Registration is
/// idempotent on `(tenant, environment, external_id)`: a second call
/// with the same identity updates the existing row and mints a fresh
/// token rather than creating a duplicate PEP, so a redeployed PEP
/// that lost its token can always recover by registering again.
#[derive(Clone)]
pub struct Service {
    repository: Repository,
    client_hub: Arc<ClientHub>,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository, client_hub: Arc<ClientHub>, stale_threshold: Duration) -> Self {
        tokio::spawn(run_staleness_sweep(repository.clone(), stale_threshold));
        Self { repository, client_hub }
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn register(&self, tenant_id: Uuid, request: RegisterRequest) -> Result<Registration, DomainError> {
        let now = chrono::Utc::now();
        let registration_token = Uuid::new_v4().to_string();
        let token_hash = token::hash(&registration_token);

        let pep = match self.repository.find_by_identity(tenant_id, request.environment, &request.external_id).await? {
            Some((mut existing, _)) => {
                existing.mode = request.mode;
                existing.metadata = request.metadata;
                existing
            }
            None => Pep {
                id: Uuid::new_v4(),
                tenant_id,
                environment: request.environment,
                external_id: request.external_id,
                mode: request.mode,
                metadata: request.metadata,
                last_seen_at: None,
                health: PepHealth::Healthy,
                registered_at: now,
            },
        };

        self.repository.upsert(&pep, &token_hash).await?;
        Ok(Registration { pep, registration_token })
    }

    pub async fn get(&self, scope: &AccessScope, pep_id: Uuid) -> Result<Pep, DomainError> {
        self.repository.get_scoped(scope, pep_id).await?.ok_or(DomainError::NotFound { pep_id })
    }

    pub async fn list(&self, scope: &AccessScope, skip: u64, limit: u64) -> Result<Vec<Pep>, DomainError> {
        self.repository.list(scope, skip, limit).await
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn heartbeat(&self, pep_id: Uuid, request: &HeartbeatRequest) -> Result<(), DomainError> {
        self.authenticate(pep_id, &request.registration_token).await?;
        self.repository.touch_heartbeat(pep_id, chrono::Utc::now()).await
    }

    pub async fn poll_effective_config(&self, pep_id: Uuid, registration_token: &str) -> Result<PollResponse, DomainError> {
        let pep = self.authenticate(pep_id, registration_token).await?;
        let scope = AccessScope::for_tenant(pep.tenant_id, pep.environment);

        let pep_config_client = self.client_hub.get::<dyn PepConfigClient>().map_err(|_| DomainError::PepConfigUnavailable)?;
        let effective_config = pep_config_client.effective_config(&scope, pep_id, pep.mode).await.map_err(|_| DomainError::PepConfigUnavailable)?;

        let bundle_builder_client = self.client_hub.get::<dyn BundleBuilderClient>().map_err(|_| DomainError::BundleBuilderUnavailable)?;
        let bundle = bundle_builder_client.get_or_build(&scope, pep_id, pep.environment).await.map_err(|_| DomainError::BundleBuilderUnavailable)?;

        Ok(PollResponse { effective_config, bundle_version: bundle.version })
    }

    pub async fn fetch_bundle(&self, pep_id: Uuid, query: &FetchBundleQuery) -> Result<BundleFetchOutcome, DomainError> {
        let pep = self.authenticate(pep_id, &query.registration_token).await?;
        let scope = AccessScope::for_tenant(pep.tenant_id, pep.environment);

        let bundle_builder_client = self.client_hub.get::<dyn BundleBuilderClient>().map_err(|_| DomainError::BundleBuilderUnavailable)?;
        let bundle = bundle_builder_client.get_or_build(&scope, pep_id, pep.environment).await.map_err(|_| DomainError::BundleBuilderUnavailable)?;

        if query.known_version.as_deref() == Some(bundle.version.as_str()) {
            return Ok(BundleFetchOutcome::NotModified);
        }
        Ok(BundleFetchOutcome::Bundle(bundle))
    }

    async fn authenticate(&self, pep_id: Uuid, registration_token: &str) -> Result<Pep, DomainError> {
        let (pep, token_hash) = self.repository.get_for_auth(pep_id).await?.ok_or(DomainError::NotFound { pep_id })?;
        if !token::verify(registration_token, &token_hash) {
            return Err(DomainError::TokenMismatch { pep_id });
        }
        Ok(pep)
    }
}

async fn run_staleness_sweep(repository: Repository, stale_threshold: Duration) {
    let mut ticker = tokio::time::interval(STALENESS_SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let cutoff = chrono::Utc::now() - chrono::Duration::from_std(stale_threshold).unwrap_or(chrono::Duration::zero());
        match repository.list_overdue(cutoff).await {
            Ok(ids) if !ids.is_empty() => {
                if let Err(error) = repository.mark_unhealthy(&ids).await {
                    tracing::warn!(%error, "failed to mark overdue PEPs unhealthy");
                }
            }
            Ok(_) => {}
            Err(error) => tracing::warn!(%error, "staleness sweep query failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cc_security::Environment;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use pep_config::domain::DeploymentMode;

    fn service_over(db: sea_orm::DatabaseConnection) -> Service {
        let repository = Repository::new(cc_db::DbConn::from_connection(db));
        Service::new(repository, Arc::new(ClientHub::new()), Duration::from_secs(120))
    }

    #[tokio::test]
    async fn poll_effective_config_reports_unavailable_without_pep_config_registered() {
        let tenant_id = Uuid::new_v4();
        let pep_row = crate::infra::entity::pep::Model {
            id: Uuid::new_v4(),
            tenant_id,
            environment: "sandbox".to_owned(),
            external_id: "pod-1".to_owned(),
            mode: "sidecar".to_owned(),
            metadata: serde_json::json!({}),
            registration_token_hash: token::hash("known-token"),
            last_seen_at: None,
            health: "healthy".to_owned(),
            registered_at: chrono::Utc::now(),
        };
        let pep_id = pep_row.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![pep_row]]).into_connection();
        let service = service_over(db);

        let error = service.poll_effective_config(pep_id, "known-token").await.unwrap_err();
        assert!(matches!(error, DomainError::PepConfigUnavailable));
    }

    #[tokio::test]
    async fn heartbeat_rejects_a_token_that_does_not_match_the_stored_hash() {
        let pep_row = crate::infra::entity::pep::Model {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            environment: "sandbox".to_owned(),
            external_id: "pod-1".to_owned(),
            mode: "sidecar".to_owned(),
            metadata: serde_json::json!({}),
            registration_token_hash: token::hash("the-real-token"),
            last_seen_at: None,
            health: "healthy".to_owned(),
            registered_at: chrono::Utc::now(),
        };
        let pep_id = pep_row.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![pep_row]]).into_connection();
        let service = service_over(db);

        let request = HeartbeatRequest { registration_token: "an-imposter-token".to_owned(), self_report: serde_json::json!({}) };
        let error = service.heartbeat(pep_id, &request).await.unwrap_err();
        assert!(matches!(error, DomainError::TokenMismatch { .. }));
    }

    #[tokio::test]
    async fn registering_the_same_identity_twice_mints_a_fresh_token_for_the_same_pep_id() {
        let tenant_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<crate::infra::entity::pep::Model, _, _>([vec![]])
            .append_exec_results([sea_orm::MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();
        let service = service_over(db);

        let request = RegisterRequest { environment: Environment::Sandbox, mode: DeploymentMode::Sidecar, external_id: "pod-1".to_owned(), metadata: serde_json::json!({}) };
        let registration = service.register(tenant_id, request).await.unwrap();
        assert!(!registration.registration_token.is_empty());
        assert_eq!(registration.pep.tenant_id, tenant_id);
    }
}
