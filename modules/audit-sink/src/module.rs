use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use sea_orm_migration::MigrationTrait;
use utoipa::openapi::OpenApi;

use crate::domain::{DomainError, NewAuditEntry, Service};
use crate::infra::{migration::Migration, repository::Repository};

/// Resolved by every other module that needs to emit an audit entry,
/// without depending on this module's storage or batching internals.
#[async_trait]
pub trait AuditSinkClient: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> Result<(), DomainError>;
}

#[async_trait]
impl AuditSinkClient for Service {
    async fn record(&self, entry: NewAuditEntry) -> Result<(), DomainError> {
        Service::record(self, entry).await
    }
}

#[derive(Default)]
pub struct AuditSinkModule {
    service: ArcSwapOption<Service>,
}

impl AuditSinkModule {
    pub(crate) fn service(&self) -> Option<Arc<Service>> {
        self.service.load_full()
    }
}

#[async_trait]
impl Module for AuditSinkModule {
    fn name(&self) -> &'static str {
        "audit-sink"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let service = Arc::new(Service::new(Repository::new(ctx.db().clone())));
        ctx.client_hub().register::<dyn AuditSinkClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for AuditSinkModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for AuditSinkModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service().ok_or_else(|| anyhow::anyhow!("audit-sink module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
