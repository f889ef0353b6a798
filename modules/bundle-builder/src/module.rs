use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use cc_security::{AccessScope, Environment};
use policy_lifecycle::BundleInvalidationClient;
use sea_orm_migration::MigrationTrait;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{Bundle, DomainError, Service};
use crate::infra::{migration::Migration, repository::Repository};

/// Resolved by `pep-coordinator` to serve a PEP's bundle without
/// depending on this module's storage, worker pool, or cache.
#[async_trait]
pub trait BundleBuilderClient: Send + Sync {
    async fn get_or_build(&self, scope: &AccessScope, pep_id: Uuid, environment: Environment) -> Result<Bundle, DomainError>;
}

#[async_trait]
impl BundleBuilderClient for Service {
    async fn get_or_build(&self, scope: &AccessScope, pep_id: Uuid, environment: Environment) -> Result<Bundle, DomainError> {
        Service::get_or_build(self, scope, pep_id, environment).await
    }
}

#[async_trait]
impl BundleInvalidationClient for Service {
    async fn mark_stale(&self, tenant_id: Uuid, _policy_id: Uuid) {
        Service::trigger_rebuild(self, tenant_id).await;
    }
}

#[derive(Default)]
pub struct BundleBuilderModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for BundleBuilderModule {
    fn name(&self) -> &'static str {
        "bundle-builder"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;
        let service = Arc::new(Service::new(Repository::new(ctx.db().clone()), ctx.client_hub().clone()));
        ctx.client_hub().register::<dyn BundleBuilderClient>(service.clone());
        ctx.client_hub().register::<dyn BundleInvalidationClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for BundleBuilderModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for BundleBuilderModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("bundle-builder module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
