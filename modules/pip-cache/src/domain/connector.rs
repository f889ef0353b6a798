use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use credential_vault::CredentialVaultClient;

use super::model::PipConnection;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectorError {
    #[error("fetch timed out")]
    Timeout,
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("credential resolution failed: {0}")]
    Credential(String),
}

/// One implementation per connection kind. `HttpApi`, `IdentityProvider`,
/// `Hris` and `Crm` connections all share [`HttpPipConnector`] since they
/// are, from this cache's point of view, just an authenticated GET.
#[async_trait]
pub trait PipConnector: Send + Sync {
    async fn fetch(&self, connection: &PipConnection, attribute_path: &str) -> Result<serde_json::Value, ConnectorError>;
}

pub struct HttpPipConnector {
    http: reqwest::Client,
    vault: Arc<dyn CredentialVaultClient>,
}

impl HttpPipConnector {
    #[must_use]
    pub fn new(vault: Arc<dyn CredentialVaultClient>) -> Self {
        Self { http: reqwest::Client::new(), vault }
    }
}

#[async_trait]
impl PipConnector for HttpPipConnector {
    #[tracing::instrument(skip(self, connection))]
    async fn fetch(&self, connection: &PipConnection, attribute_path: &str) -> Result<serde_json::Value, ConnectorError> {
        let secret = self
            .vault
            .get(connection.tenant_id, connection.credential_vault_id)
            .await
            .map_err(|e| ConnectorError::Credential(e.to_string()))?;

        let response = self
            .http
            .get(&connection.endpoint)
            .bearer_auth(secrecy::ExposeSecret::expose_secret(&secret))
            .query(&[("attribute", attribute_path)])
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| if e.is_timeout() { ConnectorError::Timeout } else { ConnectorError::Upstream(e.to_string()) })?;

        if !response.status().is_success() {
            return Err(ConnectorError::Upstream(format!("status {}", response.status())));
        }

        response.json::<serde_json::Value>().await.map_err(|e| ConnectorError::Upstream(e.to_string()))
    }
}
