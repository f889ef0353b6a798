use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cc_modkit::ClientHub;
use cc_security::{AccessScope, Environment};
use credential_vault::CredentialVaultClient;
use policy_lifecycle::PolicyLifecycleClient;
use policy_lifecycle::domain::Policy;
use secrecy::SecretString;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::backoff::delay_for_attempt;
use super::error::DomainError;
use super::layout::{metadata_path, parse_policy_path, policy_path};
use super::model::{ConflictPolicy, GitConfig, GitConfigRequest, GitConfigResponse, SyncDirection, SyncRecord, SyncStatus};
use crate::infra::git::WorkingCopy;
use crate::infra::repository::Repository;

const PUSH_CHANNEL_CAPACITY: usize = 256;
const MAX_PUSH_ATTEMPTS: u32 = 8;
const PULL_SWEEP_INTERVAL: Duration = Duration::from_secs(30);
const PUSH_TOKEN_LABEL: &str = "git-sync-token";

struct PushJob {
    tenant_id: Uuid,
    policy_id: Uuid,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct PolicyMetadata {
    name: String,
    effect: String,
    target_resource_ids: Vec<Uuid>,
}

/// Two-way synchronizer between a tenant's Git repository and the
/// policy store. Pushes are queued and retried with backoff by a
/// single background worker; pulls run on their own sweep, one tick
/// per [`PULL_SWEEP_INTERVAL`], each tenant gated by its own
/// `auto_sync_interval_seconds`.
#[derive(Clone)]
pub struct Service {
    repository: Repository,
    client_hub: Arc<ClientHub>,
    working_root: Arc<PathBuf>,
    push_queue: mpsc::Sender<PushJob>,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository, client_hub: Arc<ClientHub>, working_root: PathBuf) -> Self {
        let (push_queue, receiver) = mpsc::channel(PUSH_CHANNEL_CAPACITY);
        let working_root = Arc::new(working_root);

        tokio::spawn(run_push_worker(repository.clone(), client_hub.clone(), working_root.clone(), receiver));
        tokio::spawn(run_pull_sweep(repository.clone(), client_hub.clone(), working_root.clone()));

        Self { repository, client_hub, working_root, push_queue }
    }

    pub async fn get_config(&self, scope: &AccessScope) -> Result<GitConfigResponse, DomainError> {
        let tenant_id = scope.tenant_id().unwrap_or_else(Uuid::nil);
        self.repository.get(tenant_id).await?.map(GitConfigResponse::from).ok_or(DomainError::ConfigNotFound { tenant_id })
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn put_config(&self, scope: &AccessScope, request: GitConfigRequest) -> Result<GitConfigResponse, DomainError> {
        let tenant_id = scope.tenant_id().unwrap_or_else(Uuid::nil);
        let vault = self.client_hub.get::<dyn CredentialVaultClient>().map_err(|_| DomainError::CredentialVaultUnavailable)?;
        let credential_vault_id = vault
            .put(tenant_id, PUSH_TOKEN_LABEL, &SecretString::from(request.access_token))
            .await
            .map_err(|_| DomainError::CredentialVaultUnavailable)?;

        let existing = self.repository.get(tenant_id).await?;
        let config = GitConfig {
            tenant_id,
            remote_url: request.remote_url,
            branch: request.branch,
            credential_vault_id,
            auto_sync_interval_seconds: request.auto_sync_interval_seconds,
            conflict_policy: request.conflict_policy,
            last_pull_at: existing.as_ref().and_then(|c| c.last_pull_at),
            last_pull_status: existing.and_then(|c| c.last_pull_status),
        };
        self.repository.upsert(&config).await?;
        Ok(GitConfigResponse::from(config))
    }

    /// Clones (or opens) the working copy and performs a no-op fetch,
    /// surfacing whatever `git2` reports without touching the policy
    /// store or pushing anything.
    pub async fn test_config(&self, scope: &AccessScope) -> Result<(), DomainError> {
        let tenant_id = scope.tenant_id().unwrap_or_else(Uuid::nil);
        let config = self.repository.get(tenant_id).await?.ok_or(DomainError::ConfigNotFound { tenant_id })?;
        let token = resolve_token(&self.client_hub, tenant_id, config.credential_vault_id).await?;
        let path = tenant_working_dir(&self.working_root, tenant_id);

        tokio::task::spawn_blocking(move || -> Result<(), DomainError> {
            let copy = WorkingCopy::open_or_clone(&path, &config.remote_url, &config.branch, &token)?;
            copy.fetch_and_reset_hard(&config.branch, &token)
        })
        .await
        .map_err(|e| DomainError::RemoteFailure(e.to_string()))?
    }

    pub async fn sync_history(&self, scope: &AccessScope, skip: u64, limit: u64) -> Result<Vec<SyncRecord>, DomainError> {
        self.repository.list_history(scope, skip, limit).await
    }

    /// Best-effort: enqueues a push for the worker and returns
    /// immediately. A full channel silently drops the job, the same
    /// trade-off `bundle-builder` makes for its rebuild trigger — a
    /// later push for the same policy makes an earlier queued one
    /// redundant anyway.
    pub async fn queue_push(&self, tenant_id: Uuid, policy_id: Uuid) {
        let _ = self.push_queue.send(PushJob { tenant_id, policy_id }).await;
    }
}

async fn resolve_token(client_hub: &Arc<ClientHub>, tenant_id: Uuid, credential_vault_id: Uuid) -> Result<SecretString, DomainError> {
    let vault = client_hub.get::<dyn CredentialVaultClient>().map_err(|_| DomainError::CredentialVaultUnavailable)?;
    vault.get(tenant_id, credential_vault_id).await.map_err(|_| DomainError::CredentialVaultUnavailable)
}

fn tenant_working_dir(root: &Path, tenant_id: Uuid) -> PathBuf {
    root.join(tenant_id.to_string())
}

/// The push-queue worker: one job at a time, retried with exponential
/// backoff up to [`MAX_PUSH_ATTEMPTS`] before it gives up and records
/// the failure in sync history.
async fn run_push_worker(repository: Repository, client_hub: Arc<ClientHub>, working_root: Arc<PathBuf>, mut receiver: mpsc::Receiver<PushJob>) {
    while let Some(job) = receiver.recv().await {
        let mut attempt = 0;
        loop {
            match push_once(&repository, &client_hub, &working_root, job.tenant_id, job.policy_id).await {
                Ok(()) => break,
                Err(error) if attempt + 1 >= MAX_PUSH_ATTEMPTS => {
                    tracing::warn!(%error, tenant_id = %job.tenant_id, policy_id = %job.policy_id, "git push abandoned after max attempts");
                    let environment = resolved_environment(&client_hub, job.tenant_id, job.policy_id).await;
                    record_outcome(&repository, job.tenant_id, environment, job.policy_id, SyncDirection::Push, SyncStatus::Failed, &error.to_string()).await;
                    break;
                }
                Err(error) => {
                    tracing::warn!(%error, tenant_id = %job.tenant_id, policy_id = %job.policy_id, attempt, "git push failed, retrying");
                    tokio::time::sleep(delay_for_attempt(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

async fn push_once(repository: &Repository, client_hub: &Arc<ClientHub>, working_root: &Path, tenant_id: Uuid, policy_id: Uuid) -> Result<(), DomainError> {
    let config = repository.get(tenant_id).await?.ok_or(DomainError::ConfigNotFound { tenant_id })?;
    let policy_client = client_hub.get::<dyn PolicyLifecycleClient>().map_err(|_| DomainError::PolicyLifecycleUnavailable)?;
    let policy = fetch_policy_either_environment(policy_client.as_ref(), tenant_id, policy_id).await?;
    let token = resolve_token(client_hub, tenant_id, config.credential_vault_id).await?;
    let path = tenant_working_dir(working_root, tenant_id);
    let relative = policy_path(policy.environment, policy.id);
    let metadata_relative = metadata_path(policy.id);
    let metadata = serde_json::to_string_pretty(&PolicyMetadata { name: policy.name.clone(), effect: policy.effect.as_str().to_owned(), target_resource_ids: policy.target_resource_ids.clone() })
        .map_err(|e| DomainError::RemoteFailure(e.to_string()))?;

    let source = policy.source.clone();
    let (remote_url, branch, commit_message) = (config.remote_url.clone(), config.branch.clone(), format!("update policy {}", policy.id));
    tokio::task::spawn_blocking(move || -> Result<(), DomainError> {
        let copy = WorkingCopy::open_or_clone(&path, &remote_url, &branch, &token)?;
        copy.write_file(&relative, &source)?;
        copy.write_file(&metadata_relative, &metadata)?;
        copy.commit_all("control-core", &commit_message)?;
        copy.push(&branch, &token)
    })
    .await
    .map_err(|e| DomainError::RemoteFailure(e.to_string()))??;

    record_outcome(repository, tenant_id, policy.environment, policy.id, SyncDirection::Push, SyncStatus::Success, "pushed").await;
    Ok(())
}

async fn fetch_policy_either_environment(client: &dyn PolicyLifecycleClient, tenant_id: Uuid, policy_id: Uuid) -> Result<Policy, DomainError> {
    for environment in [Environment::Sandbox, Environment::Production] {
        let scope = AccessScope::for_tenant(tenant_id, environment);
        if let Ok(policy) = client.get(&scope, policy_id).await {
            return Ok(policy);
        }
    }
    Err(DomainError::PolicyLifecycleUnavailable)
}

/// Best-effort label for a sync-history row when the push attempt
/// itself failed before it could resolve the policy: falls back to
/// sandbox, which is always present, rather than guessing wrong in the
/// more consequential production folder.
async fn resolved_environment(client_hub: &Arc<ClientHub>, tenant_id: Uuid, policy_id: Uuid) -> Environment {
    let Ok(client) = client_hub.get::<dyn PolicyLifecycleClient>() else {
        return Environment::Sandbox;
    };
    fetch_policy_either_environment(client.as_ref(), tenant_id, policy_id).await.map(|p| p.environment).unwrap_or(Environment::Sandbox)
}

/// Ticks every [`PULL_SWEEP_INTERVAL`]; each tenant configured for Git
/// sync is pulled once its own `auto_sync_interval_seconds` has
/// elapsed since `last_pull_at`.
async fn run_pull_sweep(repository: Repository, client_hub: Arc<ClientHub>, working_root: Arc<PathBuf>) {
    let mut ticker = tokio::time::interval(PULL_SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let Ok(configs) = repository.list_all().await else {
            continue;
        };
        let now = chrono::Utc::now();
        for config in configs {
            if !due(&config, now) {
                continue;
            }
            if let Err(error) = pull_once(&repository, &client_hub, &working_root, config.tenant_id).await {
                tracing::warn!(%error, tenant_id = %config.tenant_id, "git pull failed");
            }
        }
    }
}

fn due(config: &GitConfig, now: chrono::DateTime<chrono::Utc>) -> bool {
    match config.last_pull_at {
        None => true,
        Some(last) => (now - last).num_seconds() >= config.auto_sync_interval_seconds,
    }
}

/// Fetches the remote, applies every policy file found in the working
/// copy back to the policy store, and records one sync-history row per
/// file. A failed pull surfaces on the tenant dashboard through
/// `last_pull_status` but never blocks local policy editing, per the
/// synchronizer's failure-semantics contract.
async fn pull_once(repository: &Repository, client_hub: &Arc<ClientHub>, working_root: &Path, tenant_id: Uuid) -> Result<(), DomainError> {
    let config = repository.get(tenant_id).await?.ok_or(DomainError::ConfigNotFound { tenant_id })?;
    let token = resolve_token(client_hub, tenant_id, config.credential_vault_id).await?;
    let path = tenant_working_dir(working_root, tenant_id);

    let (remote_url, branch) = (config.remote_url.clone(), config.branch.clone());
    let files = tokio::task::spawn_blocking(move || -> Result<Vec<(String, String)>, DomainError> {
        let copy = WorkingCopy::open_or_clone(&path, &remote_url, &branch, &token)?;
        copy.fetch_and_reset_hard(&branch, &token)?;
        Ok(list_policy_files(&copy))
    })
    .await
    .map_err(|e| DomainError::RemoteFailure(e.to_string()))??;

    let policy_client = client_hub.get::<dyn PolicyLifecycleClient>().map_err(|_| DomainError::PolicyLifecycleUnavailable)?;
    let mut any_failure = None;
    for (relative, source) in files {
        let Some((environment, id)) = parse_policy_path(&relative) else {
            continue;
        };
        let name = policy_client
            .get(&AccessScope::for_tenant(tenant_id, environment), id)
            .await
            .map(|p| p.name)
            .unwrap_or_else(|_| id.to_string());

        let outcome = policy_client.sync_upsert(tenant_id, environment, id, name, source).await;
        match outcome {
            Ok(_) => record_outcome(repository, tenant_id, environment, id, SyncDirection::Pull, SyncStatus::Success, "pulled").await,
            Err(error) => {
                any_failure = Some(error.to_string());
                record_outcome(repository, tenant_id, environment, id, SyncDirection::Pull, SyncStatus::Failed, &error.to_string()).await;
            }
        }
    }

    let status = any_failure.unwrap_or_else(|| "success".to_owned());
    repository.record_pull_status(tenant_id, chrono::Utc::now(), &status).await
}

fn list_policy_files(copy: &WorkingCopy) -> Vec<(String, String)> {
    copy.walk_relative_files("policies").into_iter().filter_map(|relative| copy.read_file(&relative).map(|contents| (relative, contents))).collect()
}

async fn record_outcome(repository: &Repository, tenant_id: Uuid, environment: Environment, policy_id: Uuid, direction: SyncDirection, status: SyncStatus, message: &str) {
    let record = SyncRecord { id: Uuid::new_v4(), tenant_id, environment, policy_id, direction, status, message: message.to_owned(), occurred_at: chrono::Utc::now() };
    if let Err(error) = repository.insert_history(&record).await {
        tracing::warn!(%error, tenant_id = %tenant_id, "failed to record git sync history");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn due_when_never_pulled() {
        let config = GitConfig {
            tenant_id: Uuid::new_v4(),
            remote_url: "https://example.invalid/repo.git".to_owned(),
            branch: "main".to_owned(),
            credential_vault_id: Uuid::new_v4(),
            auto_sync_interval_seconds: 300,
            conflict_policy: ConflictPolicy::ControlPlaneWins,
            last_pull_at: None,
            last_pull_status: None,
        };
        assert!(due(&config, chrono::Utc::now()));
    }

    #[test]
    fn not_due_before_the_interval_elapses() {
        let now = chrono::Utc::now();
        let config = GitConfig {
            tenant_id: Uuid::new_v4(),
            remote_url: "https://example.invalid/repo.git".to_owned(),
            branch: "main".to_owned(),
            credential_vault_id: Uuid::new_v4(),
            auto_sync_interval_seconds: 300,
            conflict_policy: ConflictPolicy::GitWins,
            last_pull_at: Some(now - chrono::Duration::seconds(10)),
            last_pull_status: Some("success".to_owned()),
        };
        assert!(!due(&config, now));
    }

    #[tokio::test]
    async fn get_config_reports_not_found_for_an_unconfigured_tenant() {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).append_query_results::<crate::infra::entity::git_config::Model, _, _>([vec![]]).into_connection();
        let repository = Repository::new(cc_db::DbConn::from_connection(db));
        let client_hub = Arc::new(ClientHub::new());
        let service = Service::new(repository, client_hub, std::env::temp_dir().join("git-sync-test"));
        let scope = AccessScope::for_tenant(Uuid::new_v4(), Environment::Sandbox);

        let error = service.get_config(&scope).await.unwrap_err();
        assert!(matches!(error, DomainError::ConfigNotFound { .. }));
    }
}
