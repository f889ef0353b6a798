use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use cc_security::AccessScope;
use sea_orm_migration::MigrationTrait;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{DomainError, Resource, Service};
use crate::infra::{migration::Migration, repository::Repository};

/// Resolved by `policy-lifecycle` and `bundle-builder` to look up the
/// resources a policy applies to, without depending on this module's
/// storage layer.
#[async_trait]
pub trait ResourcesClient: Send + Sync {
    async fn get_resource(&self, scope: &AccessScope, id: Uuid) -> Result<Resource, DomainError>;
}

#[async_trait]
impl ResourcesClient for Service {
    async fn get_resource(&self, scope: &AccessScope, id: Uuid) -> Result<Resource, DomainError> {
        self.get(scope, id).await
    }
}

#[derive(Default)]
pub struct ResourcesModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for ResourcesModule {
    fn name(&self) -> &'static str {
        "resources"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        // Validates tenancy is registered first; resources never
        // exists without a tenant owning it.
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;
        let service = Arc::new(Service::new(Repository::new(ctx.db().clone())));
        ctx.client_hub().register::<dyn ResourcesClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for ResourcesModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for ResourcesModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("resources module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
