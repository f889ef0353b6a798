use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use cc_security::AccessScope;
use credential_vault::CredentialVaultClient;
use sea_orm_migration::MigrationTrait;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{ConnectionKind, DomainError, HttpPipConnector, LookupOutcome, PipConnection, PipConnector, Service};
use crate::infra::{migration::Migration, repository::Repository};

/// Resolved by `decision-engine` to read external attributes, and by
/// `bundle-builder` to list the connections a tenant's bundles should
/// manifest, without depending on this module's connector
/// implementations or storage.
#[async_trait]
pub trait PipCacheClient: Send + Sync {
    async fn lookup(&self, scope: &AccessScope, connection_id: Uuid, attribute_path: &str) -> Result<LookupOutcome, DomainError>;
    async fn list_connections(&self, scope: &AccessScope) -> Result<Vec<PipConnection>, DomainError>;
}

#[async_trait]
impl PipCacheClient for Service {
    async fn lookup(&self, scope: &AccessScope, connection_id: Uuid, attribute_path: &str) -> Result<LookupOutcome, DomainError> {
        Service::lookup(self, scope, connection_id, attribute_path).await
    }

    async fn list_connections(&self, scope: &AccessScope) -> Result<Vec<PipConnection>, DomainError> {
        Service::list_connections(self, scope).await
    }
}

#[derive(Default)]
pub struct PipCacheModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for PipCacheModule {
    fn name(&self) -> &'static str {
        "pip-cache"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;
        let vault = ctx.client_hub().get::<dyn CredentialVaultClient>()?;
        let http_connector: Arc<dyn PipConnector> = Arc::new(HttpPipConnector::new(vault));

        let mut connectors: HashMap<ConnectionKind, Arc<dyn PipConnector>> = HashMap::new();
        for kind in [ConnectionKind::HttpApi, ConnectionKind::IdentityProvider, ConnectionKind::Hris, ConnectionKind::Crm] {
            connectors.insert(kind, http_connector.clone());
        }

        let service = Arc::new(Service::new(Repository::new(ctx.db().clone()), connectors));
        ctx.client_hub().register::<dyn PipCacheClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for PipCacheModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for PipCacheModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("pip-cache module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
