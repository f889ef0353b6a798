use sea_orm::{ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sea_orm::DbErr),
    #[error(transparent)]
    Query(#[from] sea_orm::DbErr),
}

/// A cloneable handle to the pool. Every module holds one, obtained
/// from `ModuleCtx::db_required()` at `init()` time.
#[derive(Clone)]
pub struct DbConn {
    inner: Arc<DatabaseConnection>,
}

impl DbConn {
    /// Connects and configures the pool. Called once at startup by the
    /// composition root.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connect`] if the connection cannot be
    /// established within the configured timeout.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DbError> {
        let mut opts = ConnectOptions::new(url.to_owned());
        opts.max_connections(max_connections)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8));
        let inner = Database::connect(opts).await.map_err(DbError::Connect)?;
        Ok(Self { inner: Arc::new(inner) })
    }

    #[must_use]
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Wraps an already-constructed connection, used by module tests
    /// that build a `MockDatabase` or an in-memory SQLite pool.
    #[must_use]
    pub fn from_connection(inner: DatabaseConnection) -> Self {
        Self { inner: Arc::new(inner) }
    }

    /// # Errors
    ///
    /// Returns [`DbError::Query`] if the transaction cannot be started.
    pub async fn begin(&self) -> Result<DatabaseTransaction, DbError> {
        Ok(self.inner.begin().await?)
    }
}
