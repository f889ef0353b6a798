use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use cc_security::AccessScope;
use sea_orm_migration::MigrationTrait;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{DeploymentMode, DomainError, EffectiveConfig, Service};
use crate::infra::{migration::Migration, repository::Repository};

/// Resolved by `pep-coordinator` when a PEP polls for its configuration.
#[async_trait]
pub trait PepConfigClient: Send + Sync {
    async fn effective_config(&self, scope: &AccessScope, pep_id: Uuid, mode: DeploymentMode) -> Result<EffectiveConfig, DomainError>;
}

#[async_trait]
impl PepConfigClient for Service {
    async fn effective_config(&self, scope: &AccessScope, pep_id: Uuid, mode: DeploymentMode) -> Result<EffectiveConfig, DomainError> {
        Service::effective_config(self, scope, pep_id, mode).await
    }
}

#[derive(Default)]
pub struct PepConfigModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for PepConfigModule {
    fn name(&self) -> &'static str {
        "pep-config"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;

        let service = Arc::new(Service::new(Repository::new(ctx.db().clone())));
        ctx.client_hub().register::<dyn PepConfigClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for PepConfigModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for PepConfigModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("pep-config module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
