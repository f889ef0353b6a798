use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::environment::Environment;

/// The authenticated caller of a request: either a subject bound to a
/// tenant, or the system administrator bypass used by operator tooling
/// (never issued to tenant-facing API keys).
#[derive(Debug, Clone)]
pub enum Principal {
    Subject(SecurityContext),
    SystemAdmin { tenant_id: Uuid },
}

impl Principal {
    #[must_use]
    pub fn tenant_id(&self) -> Uuid {
        match self {
            Principal::Subject(ctx) => ctx.subject_tenant_id,
            Principal::SystemAdmin { tenant_id } => *tenant_id,
        }
    }

    #[must_use]
    pub fn is_system_admin(&self) -> bool {
        matches!(self, Principal::SystemAdmin { .. })
    }
}

/// An authenticated subject: who they are, which tenant they belong to,
/// which environment their token grants access to, and the scopes the
/// PEP coordinator or API gateway should enforce.
///
/// `bearer_token` is never serialized: downstream PIP connectors that
/// need to forward it read it directly, it never leaves the process in
/// a log line or an API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContext {
    pub subject_id: Uuid,
    pub subject_type: Option<String>,
    pub subject_tenant_id: Uuid,
    pub environment: Environment,
    pub token_scopes: Vec<String>,
    #[serde(skip)]
    pub bearer_token: Option<SecretString>,
}

impl SecurityContext {
    #[must_use]
    pub fn builder(subject_id: Uuid, subject_tenant_id: Uuid, environment: Environment) -> SecurityContextBuilder {
        SecurityContextBuilder::new(subject_id, subject_tenant_id, environment)
    }

    /// An unauthenticated context, used only where the gateway has
    /// already determined the route is public.
    #[must_use]
    pub fn anonymous(environment: Environment) -> Self {
        Self {
            subject_id: Uuid::nil(),
            subject_type: Some("anonymous".to_owned()),
            subject_tenant_id: Uuid::nil(),
            environment,
            token_scopes: Vec::new(),
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.token_scopes.iter().any(|s| s == "*" || s == scope)
    }
}

#[derive(Debug, Clone)]
pub struct SecurityContextBuilder {
    subject_id: Uuid,
    subject_type: Option<String>,
    subject_tenant_id: Uuid,
    environment: Environment,
    token_scopes: Vec<String>,
    bearer_token: Option<SecretString>,
}

impl SecurityContextBuilder {
    fn new(subject_id: Uuid, subject_tenant_id: Uuid, environment: Environment) -> Self {
        Self {
            subject_id,
            subject_type: None,
            subject_tenant_id,
            environment,
            token_scopes: Vec::new(),
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn subject_type(mut self, subject_type: impl Into<String>) -> Self {
        self.subject_type = Some(subject_type.into());
        self
    }

    #[must_use]
    pub fn token_scopes(mut self, scopes: Vec<String>) -> Self {
        self.token_scopes = scopes;
        self
    }

    #[must_use]
    pub fn bearer_token(mut self, token: SecretString) -> Self {
        self.bearer_token = Some(token);
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject_id: self.subject_id,
            subject_type: self.subject_type,
            subject_tenant_id: self.subject_tenant_id,
            environment: self.environment,
            token_scopes: self.token_scopes,
            bearer_token: self.bearer_token,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ctx() -> SecurityContext {
        SecurityContext::builder(Uuid::new_v4(), Uuid::new_v4(), Environment::Sandbox)
            .subject_type("user")
            .token_scopes(vec!["policy:read".to_owned()])
            .build()
    }

    #[test]
    fn builder_sets_fields() {
        let ctx = ctx();
        assert_eq!(ctx.subject_type.as_deref(), Some("user"));
        assert!(ctx.has_scope("policy:read"));
        assert!(!ctx.has_scope("policy:write"));
    }

    #[test]
    fn wildcard_scope_grants_everything() {
        let ctx = SecurityContext::builder(Uuid::new_v4(), Uuid::new_v4(), Environment::Production)
            .token_scopes(vec!["*".to_owned()])
            .build();
        assert!(ctx.has_scope("anything:at_all"));
    }

    #[test]
    fn bearer_token_excluded_from_serialization() {
        let ctx = SecurityContext::builder(Uuid::new_v4(), Uuid::new_v4(), Environment::Sandbox)
            .bearer_token(SecretString::from("super-secret"))
            .build();
        let json = serde_json::to_string(&ctx).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!json.contains("bearer_token"));
    }

    #[test]
    fn anonymous_carries_no_scopes() {
        let ctx = SecurityContext::anonymous(Environment::Sandbox);
        assert!(ctx.token_scopes.is_empty());
        assert!(ctx.bearer_token.is_none());
    }

    #[test]
    fn system_admin_tenant_id_passthrough() {
        let tenant_id = Uuid::new_v4();
        let principal = Principal::SystemAdmin { tenant_id };
        assert_eq!(principal.tenant_id(), tenant_id);
        assert!(principal.is_system_admin());
    }
}
