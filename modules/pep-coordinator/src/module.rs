use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use sea_orm_migration::MigrationTrait;
use serde::Deserialize;
use utoipa::openapi::OpenApi;

use crate::domain::Service;
use crate::infra::{migration::Migration, repository::Repository};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PepCoordinatorConfig {
    /// PEPs that fail to poll for longer than this are marked
    /// unhealthy. Three times the spec's default 60 s poll interval,
    /// so a single missed poll under load never flips a PEP's status.
    #[serde(default = "default_stale_threshold_seconds")]
    stale_threshold_seconds: u64,
}

fn default_stale_threshold_seconds() -> u64 {
    180
}

#[derive(Default)]
pub struct PepCoordinatorModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for PepCoordinatorModule {
    fn name(&self) -> &'static str {
        "pep-coordinator"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;
        ctx.client_hub().get::<dyn pep_config::PepConfigClient>()?;
        ctx.client_hub().get::<dyn bundle_builder::BundleBuilderClient>()?;

        let config: PepCoordinatorConfig = ctx.config()?;
        let service = Arc::new(Service::new(
            Repository::new(ctx.db().clone()),
            ctx.client_hub().clone(),
            Duration::from_secs(config.stale_threshold_seconds),
        ));
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for PepCoordinatorModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for PepCoordinatorModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("pep-coordinator module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
