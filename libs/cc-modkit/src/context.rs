use std::sync::Arc;

use cc_db::DbConn;
use serde::de::DeserializeOwned;

use crate::client_hub::ClientHub;
use crate::config_slice::ConfigSliceError;

/// What the composition root hands every module at `init()` time: its
/// own configuration slice, the shared database pool, and the client
/// hub to look up the modules it depends on.
pub struct ModuleCtx {
    config: serde_json::Value,
    db: DbConn,
    client_hub: Arc<ClientHub>,
}

impl ModuleCtx {
    #[must_use]
    pub fn new(config: serde_json::Value, db: DbConn, client_hub: Arc<ClientHub>) -> Self {
        Self { config, db, client_hub }
    }

    /// # Errors
    ///
    /// Returns [`ConfigSliceError::Invalid`] if this module's slice of
    /// the configuration document does not deserialize into `T`.
    pub fn config<T: DeserializeOwned>(&self) -> Result<T, ConfigSliceError> {
        Ok(serde_json::from_value(self.config.clone())?)
    }

    #[must_use]
    pub fn db(&self) -> &DbConn {
        &self.db
    }

    #[must_use]
    pub fn client_hub(&self) -> &Arc<ClientHub> {
        &self.client_hub
    }
}
