use uuid::Uuid;

use crate::environment::Environment;

/// The tenant-scope filter every repository query must apply before it
/// touches the database. An empty scope denies all rows; there is no
/// "unscoped" escape hatch reachable from request-handling code.
#[derive(Debug, Clone)]
pub struct AccessScope {
    tenant_id: Option<Uuid>,
    environment: Option<Environment>,
    resource_id: Option<Uuid>,
}

impl AccessScope {
    /// Denies every row. The default for any code path that has not
    /// explicitly established a scope.
    #[must_use]
    pub fn deny_all() -> Self {
        Self { tenant_id: None, environment: None, resource_id: None }
    }

    #[must_use]
    pub fn for_tenant(tenant_id: Uuid, environment: Environment) -> Self {
        Self { tenant_id: Some(tenant_id), environment: Some(environment), resource_id: None }
    }

    #[must_use]
    pub fn for_resource(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    #[must_use]
    pub fn environment(&self) -> Option<Environment> {
        self.environment
    }

    #[must_use]
    pub fn resource_id(&self) -> Option<Uuid> {
        self.resource_id
    }

    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        self.tenant_id.is_none()
    }

    /// Fails closed: a scope may only be narrowed, never widened, by
    /// comparing against the tenant/environment it was built for.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::TenantMismatch`] if `tenant_id` differs, or
    /// [`ScopeError::EnvironmentMismatch`] if `environment` differs.
    pub fn require(&self, tenant_id: Uuid, environment: Environment) -> Result<(), ScopeError> {
        if self.is_deny_all() {
            return Err(ScopeError::Denied);
        }
        if self.tenant_id != Some(tenant_id) {
            return Err(ScopeError::TenantMismatch);
        }
        if self.environment != Some(environment) {
            return Err(ScopeError::EnvironmentMismatch);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("access scope denies all rows")]
    Denied,
    #[error("tenant does not match the request's access scope")]
    TenantMismatch,
    #[error("environment does not match the request's access scope")]
    EnvironmentMismatch,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deny_all_rejects_every_tenant() {
        let scope = AccessScope::deny_all();
        assert!(scope.is_deny_all());
        assert!(scope.require(Uuid::new_v4(), Environment::Sandbox).is_err());
    }

    #[test]
    fn scoped_tenant_accepts_matching_request() {
        let tenant_id = Uuid::new_v4();
        let scope = AccessScope::for_tenant(tenant_id, Environment::Production);
        scope.require(tenant_id, Environment::Production).unwrap();
    }

    #[test]
    fn scoped_tenant_rejects_other_tenant() {
        let scope = AccessScope::for_tenant(Uuid::new_v4(), Environment::Production);
        assert_eq!(scope.require(Uuid::new_v4(), Environment::Production), Err(ScopeError::TenantMismatch));
    }

    #[test]
    fn scoped_tenant_rejects_other_environment() {
        let tenant_id = Uuid::new_v4();
        let scope = AccessScope::for_tenant(tenant_id, Environment::Sandbox);
        assert_eq!(scope.require(tenant_id, Environment::Production), Err(ScopeError::EnvironmentMismatch));
    }
}
