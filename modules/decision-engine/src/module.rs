use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{Module, ModuleCtx, RestApiCapability};
use serde::Deserialize;
use utoipa::openapi::OpenApi;

use crate::domain::{ReferenceEvaluator, Service};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DecisionEngineConfig {
    /// How long a cached decision stays valid. Keyed alongside
    /// `bundle_version`, so advancing a tenant's bundle orphans stale
    /// entries immediately; this bound only caps how long an
    /// unreachable-but-unchanged bundle's decisions stay cached.
    #[serde(default = "default_cache_ttl_seconds")]
    cache_ttl_seconds: u64,
}

fn default_cache_ttl_seconds() -> u64 {
    30
}

#[derive(Default)]
pub struct DecisionEngineModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for DecisionEngineModule {
    fn name(&self) -> &'static str {
        "decision-engine"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;
        ctx.client_hub().get::<dyn pep_config::PepConfigClient>()?;
        ctx.client_hub().get::<dyn bundle_builder::BundleBuilderClient>()?;
        ctx.client_hub().get::<dyn policy_lifecycle::PolicyLifecycleClient>()?;
        ctx.client_hub().get::<dyn audit_sink::AuditSinkClient>()?;

        let config: DecisionEngineConfig = ctx.config()?;
        let service = Arc::new(Service::new(ctx.client_hub().clone(), Arc::new(ReferenceEvaluator), Duration::from_secs(config.cache_ttl_seconds)));
        self.service.store(Some(service));
        Ok(())
    }
}

impl RestApiCapability for DecisionEngineModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("decision-engine module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
