use secrecy::SecretString;
use uuid::Uuid;

use super::envelope;
use super::error::DomainError;
use crate::infra::repository::Repository;

/// `put`/`get`/`rotate` over the AEAD envelope. The master key never
/// leaves this service: it is read once from configuration at startup
/// and held only in memory.
#[derive(Clone)]
pub struct Service {
    repository: Repository,
    master_key: SecretString,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository, master_key: SecretString) -> Self {
        Self { repository, master_key }
    }

    #[tracing::instrument(skip(self, secret))]
    pub async fn put(&self, tenant_id: Uuid, label: &str, secret: &SecretString) -> Result<Uuid, DomainError> {
        let ciphertext = envelope::seal(&self.master_key, tenant_id, secret)?;
        self.repository.store(tenant_id, label, ciphertext).await
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<SecretString, DomainError> {
        let ciphertext = self.repository.load(tenant_id, id).await?;
        envelope::open(&self.master_key, tenant_id, &ciphertext)
    }

    /// Re-encrypts a vault entry under a freshly supplied secret value,
    /// keeping the same vault id so dependents holding it do not need
    /// to be updated.
    pub async fn rotate(&self, tenant_id: Uuid, id: Uuid, new_secret: &SecretString) -> Result<(), DomainError> {
        let ciphertext = envelope::seal(&self.master_key, tenant_id, new_secret)?;
        self.repository.replace(tenant_id, id, ciphertext).await
    }
}
