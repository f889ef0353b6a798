use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx, RestApiCapability};
use policy_lifecycle::GitPushClient;
use sea_orm_migration::MigrationTrait;
use serde::Deserialize;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::Service;
use crate::infra::{migration::Migration, repository::Repository};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GitSyncConfig {
    #[serde(default = "default_working_root")]
    working_root: PathBuf,
}

fn default_working_root() -> PathBuf {
    std::env::temp_dir().join("control-core-git-sync")
}

#[async_trait]
impl GitPushClient for Service {
    async fn queue_push(&self, tenant_id: Uuid, policy_id: Uuid) {
        Service::queue_push(self, tenant_id, policy_id).await;
    }
}

#[derive(Default)]
pub struct GitSyncModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for GitSyncModule {
    fn name(&self) -> &'static str {
        "git-sync"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;
        ctx.client_hub().get::<dyn credential_vault::CredentialVaultClient>()?;
        let config: GitSyncConfig = ctx.config()?;
        let service = Arc::new(Service::new(Repository::new(ctx.db().clone()), ctx.client_hub().clone(), config.working_root));
        ctx.client_hub().register::<dyn GitPushClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for GitSyncModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}

impl RestApiCapability for GitSyncModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let service = self.service.load_full().ok_or_else(|| anyhow::anyhow!("git-sync module not initialized"))?;
        Ok(crate::api::rest::register(router, openapi, service))
    }
}
