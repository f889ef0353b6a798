use std::sync::Arc;

use cc_modkit::ClientHub;
use cc_security::AccessScope;
use resources::ResourcesClient;
use uuid::Uuid;

use super::conflict::conflict_check;
use super::error::DomainError;
use super::model::{Policy, PolicyConflict, PolicyEffect, PolicyFolder, PolicyPatch, PolicyTemplate, PromotionStatus};
use super::templates;
use super::validate::validate_policy_source;
use crate::infra::repository::Repository;
use crate::module::{BundleInvalidationClient, GitPushClient};

#[derive(Clone)]
pub struct Service {
    repository: Repository,
    client_hub: Arc<ClientHub>,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository, client_hub: Arc<ClientHub>) -> Self {
        Self { repository, client_hub }
    }

    #[tracing::instrument(skip(self, source))]
    pub async fn create(
        &self,
        scope: &AccessScope,
        name: String,
        description: String,
        source: String,
        target_resource_ids: Vec<Uuid>,
        effect: PolicyEffect,
    ) -> Result<Policy, DomainError> {
        validate_policy_source(&source).map_err(|e| DomainError::InvalidSource(e.to_string()))?;
        self.assert_resources_exist(scope, &target_resource_ids).await?;

        let tenant_id = scope.tenant_id().unwrap_or_else(Uuid::nil);
        let environment = scope.environment().unwrap_or(cc_security::Environment::Sandbox);
        let policy = Policy::draft(tenant_id, environment, name, description, source, target_resource_ids, effect);
        let saved = self.repository.insert(policy).await?;
        self.notify_changed(saved.tenant_id, saved.id).await;
        Ok(saved)
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, scope: &AccessScope, id: Uuid, patch: PolicyPatch, production_write_allowed: bool) -> Result<Policy, DomainError> {
        let mut policy = self.repository.get(scope, id).await?;
        if policy.environment == cc_security::Environment::Production && !production_write_allowed {
            return Err(DomainError::ProductionWriteLocked { id });
        }

        if let Some(name) = patch.name {
            policy.name = name;
        }
        if let Some(description) = patch.description {
            policy.description = description;
        }
        if let Some(source) = patch.source {
            validate_policy_source(&source).map_err(|e| DomainError::InvalidSource(e.to_string()))?;
            policy.source = source;
        }
        if let Some(target_resource_ids) = patch.target_resource_ids {
            self.assert_resources_exist(scope, &target_resource_ids).await?;
            policy.target_resource_ids = target_resource_ids;
        }
        if let Some(effect) = patch.effect {
            policy.effect = effect;
        }
        if let Some(folder) = patch.folder {
            policy.folder = folder;
        }

        let saved = self.repository.update(policy).await?;
        self.notify_changed(saved.tenant_id, saved.id).await;
        Ok(saved)
    }

    /// Atomically copies the sandbox row to a new production row,
    /// linking the ancestor, per the one-way sandbox→production
    /// promotion invariant.
    #[tracing::instrument(skip(self))]
    pub async fn promote(&self, scope: &AccessScope, id: Uuid, actor: Uuid) -> Result<Policy, DomainError> {
        let sandbox = self.repository.get(scope, id).await?;
        if sandbox.environment != cc_security::Environment::Sandbox {
            return Err(DomainError::NotInSandbox { id });
        }

        let mut production = sandbox.clone();
        production.id = Uuid::new_v4();
        production.environment = cc_security::Environment::Production;
        production.promoted_from_sandbox = true;
        production.promoted_at = Some(chrono::Utc::now());
        production.promoted_by = Some(actor);
        production.sandbox_ancestor_id = Some(sandbox.id);
        production.sandbox_status = PromotionStatus::NotPromoted;
        production.production_status = PromotionStatus::Active;
        production.created_at = chrono::Utc::now();

        let promoted = self.repository.promote(sandbox.id, production).await?;
        self.notify_changed(promoted.tenant_id, promoted.id).await;
        Ok(promoted)
    }

    pub async fn retire(&self, scope: &AccessScope, id: Uuid) -> Result<Policy, DomainError> {
        let mut policy = self.repository.get(scope, id).await?;
        match policy.environment {
            cc_security::Environment::Sandbox if policy.sandbox_status == PromotionStatus::Retired => return Err(DomainError::AlreadyRetired { id }),
            cc_security::Environment::Production if policy.production_status == PromotionStatus::Retired => return Err(DomainError::AlreadyRetired { id }),
            cc_security::Environment::Sandbox => policy.sandbox_status = PromotionStatus::Retired,
            cc_security::Environment::Production => policy.production_status = PromotionStatus::Retired,
        }
        let saved = self.repository.update(policy).await?;
        self.notify_changed(saved.tenant_id, saved.id).await;
        Ok(saved)
    }

    pub async fn get(&self, scope: &AccessScope, id: Uuid) -> Result<Policy, DomainError> {
        self.repository.get(scope, id).await
    }

    pub async fn list(&self, scope: &AccessScope) -> Result<Vec<Policy>, DomainError> {
        self.repository.list(scope).await
    }

    /// Every `enabled`, non-retired policy in the tenant/environment —
    /// the module set a bundle build pulls from.
    pub async fn list_enabled(&self, scope: &AccessScope) -> Result<Vec<Policy>, DomainError> {
        let all = self.repository.list(scope).await?;
        Ok(all.into_iter().filter(|p| p.folder == PolicyFolder::Enabled && !is_retired(p)).collect())
    }

    pub async fn conflict_check(&self, scope: &AccessScope, candidate: &Policy) -> Result<Vec<PolicyConflict>, DomainError> {
        let others = self.repository.list(scope).await?;
        Ok(conflict_check(candidate, &others))
    }

    #[must_use]
    pub fn list_templates(&self) -> &'static [PolicyTemplate] {
        templates::TEMPLATES
    }

    pub async fn instantiate_template(&self, scope: &AccessScope, template_id: &str) -> Result<Policy, DomainError> {
        let template = templates::find(template_id).ok_or_else(|| DomainError::TemplateNotFound { id: template_id.to_owned() })?;
        let tenant_id = scope.tenant_id().unwrap_or_else(Uuid::nil);
        let policy = Policy::draft(
            tenant_id,
            cc_security::Environment::Sandbox,
            template.name.to_owned(),
            format!("instantiated from template `{}`", template.id),
            template.source.to_owned(),
            Vec::new(),
            PolicyEffect::Deny,
        );
        self.repository.insert(policy).await
    }

    /// Applies a policy file pulled from Git: updates the row if `id`
    /// already exists, inserts it under that same id otherwise. Unlike
    /// [`Self::create`]/[`Self::update`] this only notifies the bundle
    /// builder, never `GitPushClient` — the change originated from Git,
    /// so pushing it back would be a no-op at best and a sync loop at
    /// worst.
    #[tracing::instrument(skip(self, name, source))]
    pub async fn sync_upsert(&self, tenant_id: Uuid, environment: cc_security::Environment, id: Uuid, name: String, source: String) -> Result<Policy, DomainError> {
        validate_policy_source(&source).map_err(|e| DomainError::InvalidSource(e.to_string()))?;
        let scope = AccessScope::for_tenant(tenant_id, environment);

        let saved = match self.repository.get(&scope, id).await {
            Ok(mut policy) => {
                policy.name = name;
                policy.source = source;
                self.repository.update(policy).await?
            }
            Err(DomainError::NotFound { .. }) => {
                let mut policy = Policy::draft(tenant_id, environment, name, String::new(), source, Vec::new(), PolicyEffect::Deny);
                policy.id = id;
                self.repository.insert(policy).await?
            }
            Err(other) => return Err(other),
        };

        if let Ok(client) = self.client_hub.get::<dyn BundleInvalidationClient>() {
            client.mark_stale(saved.tenant_id, saved.id).await;
        }
        Ok(saved)
    }

    async fn assert_resources_exist(&self, scope: &AccessScope, resource_ids: &[Uuid]) -> Result<(), DomainError> {
        if let Ok(resources) = self.client_hub.get::<dyn ResourcesClient>() {
            for resource_id in resource_ids {
                resources.get_resource(scope, *resource_id).await.map_err(|_| DomainError::ResourceNotFound { resource_id: *resource_id })?;
            }
        }
        Ok(())
    }

    /// Fans a policy change out to whichever downstream modules have
    /// registered interest. Both legs are best-effort: the bundle
    /// builder is eventually consistent, and a tenant with no Git
    /// remote configured simply has no `GitPushClient` to find.
    async fn notify_changed(&self, tenant_id: Uuid, policy_id: Uuid) {
        if let Ok(client) = self.client_hub.get::<dyn BundleInvalidationClient>() {
            client.mark_stale(tenant_id, policy_id).await;
        }
        if let Ok(client) = self.client_hub.get::<dyn GitPushClient>() {
            client.queue_push(tenant_id, policy_id).await;
        }
    }
}

fn is_retired(policy: &Policy) -> bool {
    match policy.environment {
        cc_security::Environment::Sandbox => policy.sandbox_status == PromotionStatus::Retired,
        cc_security::Environment::Production => policy.production_status == PromotionStatus::Retired,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn is_retired_checks_the_status_for_the_row_environment() {
        let mut policy = Policy::draft(Uuid::new_v4(), cc_security::Environment::Sandbox, "p".to_owned(), String::new(), "package p\n".to_owned(), vec![], PolicyEffect::Deny);
        assert!(!is_retired(&policy));
        policy.sandbox_status = PromotionStatus::Retired;
        assert!(is_retired(&policy));
    }

    #[tokio::test]
    async fn promote_copies_the_sandbox_row_into_a_new_production_row() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let tenant_id = Uuid::new_v4();
        let sandbox_id = Uuid::new_v4();
        let sandbox = Policy::draft(tenant_id, cc_security::Environment::Sandbox, "p".to_owned(), String::new(), "package p\n".to_owned(), vec![], PolicyEffect::Deny);
        let mut sandbox = sandbox;
        sandbox.id = sandbox_id;

        let sandbox_model = crate::infra::entity::policy::Model {
            id: sandbox.id,
            tenant_id: sandbox.tenant_id,
            environment: sandbox.environment.to_string(),
            name: sandbox.name.clone(),
            description: sandbox.description.clone(),
            source: sandbox.source.clone(),
            target_resource_ids: serde_json::json!([]),
            effect: sandbox.effect.as_str().to_owned(),
            folder: sandbox.folder.as_str().to_owned(),
            sandbox_status: sandbox.sandbox_status.as_str().to_owned(),
            production_status: sandbox.production_status.as_str().to_owned(),
            promoted_from_sandbox: false,
            promoted_at: None,
            promoted_by: None,
            sandbox_ancestor_id: None,
            created_at: sandbox.created_at,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sandbox_model.clone()]])
            .append_query_results([vec![sandbox_model]])
            .append_exec_results([
                sea_orm::MockExecResult { last_insert_id: 0, rows_affected: 1 },
                sea_orm::MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .into_connection();

        let repository = Repository::new(cc_db::DbConn::from_connection(db));
        let service = Service::new(repository, Arc::new(ClientHub::new()));
        let scope = AccessScope::for_tenant(tenant_id, cc_security::Environment::Sandbox);

        let promoted = service.promote(&scope, sandbox_id, Uuid::new_v4()).await.unwrap();
        assert_eq!(promoted.environment, cc_security::Environment::Production);
        assert!(promoted.promoted_from_sandbox);
        assert_eq!(promoted.sandbox_ancestor_id, Some(sandbox_id));
        assert_ne!(promoted.id, sandbox_id);
    }
}
