use std::collections::HashMap;
use std::sync::Arc;

use cc_security::AccessScope;
use dashmap::DashMap;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::connector::{ConnectorError, PipConnector};
use super::error::DomainError;
use super::model::{ConnectionKind, LookupOutcome, PipConnection};
use crate::infra::repository::Repository;

type InFlight = Arc<OnceCell<Result<serde_json::Value, ConnectorError>>>;

/// External-attribute cache. Lookups are served from storage when
/// fresh; on a miss or a stale hit, at most one fetch per
/// `(connection, attribute)` runs at a time and concurrent callers
/// share its result.
#[derive(Clone)]
pub struct Service {
    repository: Repository,
    connectors: Arc<HashMap<ConnectionKind, Arc<dyn PipConnector>>>,
    in_flight: Arc<DashMap<(Uuid, String), InFlight>>,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository, connectors: HashMap<ConnectionKind, Arc<dyn PipConnector>>) -> Self {
        Self { repository, connectors: Arc::new(connectors), in_flight: Arc::new(DashMap::new()) }
    }

    pub async fn register_connection(&self, connection: PipConnection) -> Result<PipConnection, DomainError> {
        self.repository.upsert_connection(connection).await
    }

    pub async fn get_connection(&self, scope: &AccessScope, id: Uuid) -> Result<PipConnection, DomainError> {
        self.repository.get_connection(scope, id).await
    }

    pub async fn list_connections(&self, scope: &AccessScope) -> Result<Vec<PipConnection>, DomainError> {
        self.repository.list_connections(scope).await
    }

    #[tracing::instrument(skip(self, scope))]
    pub async fn lookup(&self, scope: &AccessScope, connection_id: Uuid, attribute_path: &str) -> Result<LookupOutcome, DomainError> {
        let cached = self.repository.get_cached(connection_id, attribute_path).await?;
        if let Some(cached) = &cached {
            if cached.is_fresh() {
                return Ok(LookupOutcome::Fresh(cached.value.clone()));
            }
        }

        let connection = self.repository.get_connection(scope, connection_id).await?;
        let connector = self
            .connectors
            .get(&connection.kind)
            .ok_or(DomainError::UnsupportedKind { id: connection_id })?
            .clone();

        let key = (connection_id, attribute_path.to_owned());
        let cell = self.in_flight.entry(key.clone()).or_insert_with(|| Arc::new(OnceCell::new())).clone();
        let outcome = cell
            .get_or_init(|| async {
                tokio::time::timeout(std::time::Duration::from_secs(5), connector.fetch(&connection, attribute_path))
                    .await
                    .unwrap_or(Err(ConnectorError::Timeout))
            })
            .await
            .clone();
        // The cell's result is only useful to whoever is racing it right
        // now; remove it so the next miss starts a fresh fetch instead
        // of replaying a stale error forever.
        self.in_flight.remove(&key);

        match outcome {
            Ok(value) => {
                self.repository.upsert_cache(connection_id, attribute_path, value.clone(), 300).await?;
                Ok(LookupOutcome::Fresh(value))
            }
            Err(_) => match cached {
                Some(stale) => Ok(LookupOutcome::Stale(stale.value)),
                None => Ok(LookupOutcome::Missing),
            },
        }
    }

    pub async fn invalidate(&self, connection_id: Uuid) -> Result<(), DomainError> {
        self.repository.delete_cache_for_connection(connection_id).await
    }

    #[tracing::instrument(skip(self, scope))]
    pub async fn bulk_refresh(&self, scope: &AccessScope, connection_id: Uuid) -> Result<usize, DomainError> {
        let keys = self.repository.list_cached_keys(connection_id).await?;
        let mut refreshed = 0;
        for key in keys {
            if self.lookup(scope, connection_id, &key).await.is_ok() {
                refreshed += 1;
            }
        }
        self.repository.mark_synced(connection_id).await?;
        Ok(refreshed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::model::ConnectionStatus;
    use cc_security::Environment;
    use sea_orm::{DatabaseBackend, MockDatabase};

    struct AlwaysOk;
    #[async_trait::async_trait]
    impl PipConnector for AlwaysOk {
        async fn fetch(&self, _connection: &PipConnection, _attribute_path: &str) -> Result<serde_json::Value, ConnectorError> {
            Ok(serde_json::json!("engineering"))
        }
    }

    fn service_with_mock(connection: PipConnection) -> (Service, Uuid) {
        let id = connection.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::infra::entity::cache::Model>::new()])
            .append_query_results([vec![crate::infra::entity::connection::Model {
                id: connection.id,
                tenant_id: connection.tenant_id,
                environment: connection.environment.to_string(),
                kind: connection.kind.as_str().to_owned(),
                endpoint: connection.endpoint.clone(),
                credential_vault_id: connection.credential_vault_id,
                attribute_mapping: connection.attribute_mapping.clone(),
                sync_frequency_seconds: connection.sync_frequency_seconds,
                last_synced_at: connection.last_synced_at,
                status: "active".to_owned(),
                created_at: connection.created_at,
            }]])
            .append_exec_results([sea_orm::MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();
        let repository = Repository::new(cc_db::DbConn::from_connection(db));
        let mut connectors: HashMap<ConnectionKind, Arc<dyn PipConnector>> = HashMap::new();
        connectors.insert(ConnectionKind::HttpApi, Arc::new(AlwaysOk));
        (Service::new(repository, connectors), id)
    }

    #[tokio::test]
    async fn lookup_falls_through_to_the_connector_on_a_cold_cache() {
        let connection = PipConnection {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            environment: Environment::Sandbox,
            kind: ConnectionKind::HttpApi,
            endpoint: "https://example.invalid/attrs".to_owned(),
            credential_vault_id: Uuid::new_v4(),
            attribute_mapping: serde_json::json!({}),
            sync_frequency_seconds: 300,
            last_synced_at: None,
            status: ConnectionStatus::Active,
            created_at: chrono::Utc::now(),
        };
        let scope = AccessScope::for_tenant(connection.tenant_id, connection.environment);
        let (service, id) = service_with_mock(connection);
        let outcome = service.lookup(&scope, id, "department").await.unwrap();
        assert_eq!(outcome, LookupOutcome::Fresh(serde_json::json!("engineering")));
    }
}
