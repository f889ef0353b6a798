use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use cc_modkit::{DatabaseCapability, Module, ModuleCtx};
use sea_orm_migration::MigrationTrait;
use secrecy::SecretString;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{DomainError, Service};
use crate::infra::{migration::Migration, repository::Repository};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialVaultConfig {
    master_key: String,
}

/// Resolved by `pip-cache` (connection credentials) and `git-sync`
/// (remote tokens) to read and write secrets without ever touching the
/// encryption envelope themselves.
#[async_trait]
pub trait CredentialVaultClient: Send + Sync {
    async fn put(&self, tenant_id: Uuid, label: &str, secret: &SecretString) -> Result<Uuid, DomainError>;
    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<SecretString, DomainError>;
    async fn rotate(&self, tenant_id: Uuid, id: Uuid, new_secret: &SecretString) -> Result<(), DomainError>;
}

#[async_trait]
impl CredentialVaultClient for Service {
    async fn put(&self, tenant_id: Uuid, label: &str, secret: &SecretString) -> Result<Uuid, DomainError> {
        Service::put(self, tenant_id, label, secret).await
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<SecretString, DomainError> {
        Service::get(self, tenant_id, id).await
    }

    async fn rotate(&self, tenant_id: Uuid, id: Uuid, new_secret: &SecretString) -> Result<(), DomainError> {
        Service::rotate(self, tenant_id, id, new_secret).await
    }
}

#[derive(Default)]
pub struct CredentialVaultModule {
    service: ArcSwapOption<Service>,
}

#[async_trait]
impl Module for CredentialVaultModule {
    fn name(&self) -> &'static str {
        "credential-vault"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let config: CredentialVaultConfig = ctx.config()?;
        let service = Arc::new(Service::new(Repository::new(ctx.db().clone()), SecretString::from(config.master_key)));
        ctx.client_hub().register::<dyn CredentialVaultClient>(service.clone());
        self.service.store(Some(service));
        Ok(())
    }
}

impl DatabaseCapability for CredentialVaultModule {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Migration)]
    }
}
