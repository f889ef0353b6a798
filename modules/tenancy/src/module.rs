use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use sea_orm_migration::MigrationTrait;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{DomainError, Service, Tenant};
use crate::infra::{migration::Migration, repository::Repository};

/// The client other modules resolve from the `ClientHub` to validate a
/// tenant exists and is not suspended, without depending on this
/// module's storage layer.
#[async_trait]
pub trait TenancyClient: Send + Sync {
    async fn get_tenant(&self, id: Uuid) -> Result<Tenant, DomainError>;
}

#[async_trait]
impl TenancyClient for Service {
    async fn get_tenant(&self, id: Uuid) -> Result<Tenant, DomainError> {
        self.get(id).await
    }
}

#[derive(Default)]
pub struct TenancyModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for TenancyModule {
    fn name(&self) -> &'static str {
        "tenancy"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let repository = Repository::new(ctx.db().clone());
        let service = Arc::new(Service::new(repository));
        ctx.client_hub().register::<dyn TenancyClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for TenancyModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for TenancyModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("tenancy module not initialized"))?;
        Ok(crate::api::rest::routes::register(router, openapi, service))
    }
}
