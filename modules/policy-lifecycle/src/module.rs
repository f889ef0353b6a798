use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use cc_security::AccessScope;
use sea_orm_migration::MigrationTrait;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{DomainError, Policy, Service};
use crate::infra::{migration::Migration, repository::Repository};

/// Implemented by `bundle-builder` and looked up lazily: a policy
/// create/update/promote/retire fires this, best-effort, so the
/// builder can mark the affected bundles stale. Absence of a
/// registered implementation (e.g. during tests) is not an error —
/// the builder is eventually consistent by design.
#[async_trait]
pub trait BundleInvalidationClient: Send + Sync {
    async fn mark_stale(&self, tenant_id: Uuid, policy_id: Uuid);
}

/// Implemented by `git-sync` and looked up lazily: a policy create/
/// update/promote fires this so the synchronizer can push the changed
/// file to the tenant's configured repository. Absent implementation
/// (no Git remote configured, or the module not started) is tolerated
/// the same way as [`BundleInvalidationClient`].
#[async_trait]
pub trait GitPushClient: Send + Sync {
    async fn queue_push(&self, tenant_id: Uuid, policy_id: Uuid);
}

/// Resolved by `bundle-builder` to read the module set it assembles
/// into a bundle.
#[async_trait]
pub trait PolicyLifecycleClient: Send + Sync {
    async fn list_enabled(&self, scope: &AccessScope) -> Result<Vec<Policy>, DomainError>;
    async fn get(&self, scope: &AccessScope, id: Uuid) -> Result<Policy, DomainError>;
    async fn sync_upsert(&self, tenant_id: Uuid, environment: cc_security::Environment, id: Uuid, name: String, source: String) -> Result<Policy, DomainError>;
}

#[async_trait]
impl PolicyLifecycleClient for Service {
    async fn list_enabled(&self, scope: &AccessScope) -> Result<Vec<Policy>, DomainError> {
        Service::list_enabled(self, scope).await
    }

    async fn get(&self, scope: &AccessScope, id: Uuid) -> Result<Policy, DomainError> {
        Service::get(self, scope, id).await
    }

    async fn sync_upsert(&self, tenant_id: Uuid, environment: cc_security::Environment, id: Uuid, name: String, source: String) -> Result<Policy, DomainError> {
        Service::sync_upsert(self, tenant_id, environment, id, name, source).await
    }
}

#[derive(Default)]
pub struct PolicyLifecycleModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for PolicyLifecycleModule {
    fn name(&self) -> &'static str {
        "policy-lifecycle"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;
        let service = Arc::new(Service::new(Repository::new(ctx.db().clone()), ctx.client_hub().clone()));
        ctx.client_hub().register::<dyn PolicyLifecycleClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for PolicyLifecycleModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for PolicyLifecycleModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("policy-lifecycle module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
