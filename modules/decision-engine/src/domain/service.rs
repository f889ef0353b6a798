use std::sync::Arc;
use std::time::Duration;

use audit_sink::AuditSinkClient;
use audit_sink::domain::NewAuditEntry;
use bundle_builder::BundleBuilderClient;
use cc_modkit::ClientHub;
use cc_security::{AccessScope, Environment, Principal};
use pep_config::PepConfigClient;
use pip_cache::PipCacheClient;
use policy_lifecycle::PolicyLifecycleClient;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::cache::{CacheKey, DecisionCache};
use super::error::DomainError;
use super::evaluator::PolicyEvaluator;
use super::model::{DecisionEffect, DecisionOutcome, DecisionRequest, EvaluationOutcome, SYSTEM_ADMIN_POLICY_ID, combine};

/// Evaluates `decide` requests against a PEP's active bundle. A
/// system-administrator principal short-circuits before the evaluator
/// or cache are ever touched; every other path is cached on
/// `(bundle_version, subject, resource, action, context)` with the
/// evaluator only running on a miss.
#[derive(Clone)]
pub struct Service {
    client_hub: Arc<ClientHub>,
    evaluator: Arc<dyn PolicyEvaluator>,
    cache: Arc<DecisionCache>,
}

impl Service {
    #[must_use]
    pub fn new(client_hub: Arc<ClientHub>, evaluator: Arc<dyn PolicyEvaluator>, cache_ttl: Duration) -> Self {
        Self { client_hub, evaluator, cache: Arc::new(DecisionCache::new(cache_ttl)) }
    }

    #[tracing::instrument(skip(self, principal, request))]
    pub async fn decide(&self, principal: &Principal, environment: Environment, request: DecisionRequest) -> Result<DecisionOutcome, DomainError> {
        let tenant_id = principal.tenant_id();

        if principal.is_system_admin() {
            let outcome = DecisionOutcome { effect: DecisionEffect::Permit, matched_policy_id: Some(SYSTEM_ADMIN_POLICY_ID), cached: false };
            self.audit(tenant_id, &request, &outcome, "system_admin_bypass").await?;
            return Ok(outcome);
        }

        let scope = AccessScope::for_tenant(tenant_id, environment);
        let bundle_builder = self.client_hub.get::<dyn BundleBuilderClient>().map_err(|_| DomainError::BundleBuilderUnavailable)?;
        let bundle = bundle_builder.get_or_build(&scope, request.pep_id, environment).await.map_err(|_| DomainError::BundleBuilderUnavailable)?;

        let subject_hash = canonical_hash(&request.subject);
        let context_hash = canonical_hash(&request.context);
        let cache_key = CacheKey {
            bundle_version: bundle.version.clone(),
            subject_hash,
            resource_id: request.resource_id,
            action: request.action.clone(),
            context_hash,
        };

        if let Some((effect, matched_policy_id)) = self.cache.get(&cache_key) {
            let outcome = DecisionOutcome { effect, matched_policy_id, cached: true };
            self.audit(tenant_id, &request, &outcome, "cached").await?;
            return Ok(outcome);
        }

        let pep_config = self.client_hub.get::<dyn PepConfigClient>().map_err(|_| DomainError::PepConfigUnavailable)?;
        let effective_config = pep_config.effective_config(&scope, request.pep_id, request.mode).await.map_err(|_| DomainError::PepConfigUnavailable)?;

        if let Some(missing_attribute) = self.first_missing_required_attribute(&scope, &request).await {
            tracing::warn!(%missing_attribute, "required PIP attribute missing, falling back to fail policy");
            let effect = match effective_config.fail_policy {
                pep_config::domain::FailPolicy::FailClosed => DecisionEffect::Deny,
                pep_config::domain::FailPolicy::FailOpen => DecisionEffect::Permit,
            };
            let outcome = DecisionOutcome { effect, matched_policy_id: None, cached: false };
            self.audit(tenant_id, &request, &outcome, "fail_policy").await?;
            return Ok(outcome);
        }

        let policy_lifecycle = self.client_hub.get::<dyn PolicyLifecycleClient>().map_err(|_| DomainError::PolicyLifecycleUnavailable)?;
        let policies = policy_lifecycle.list_enabled(&scope).await.map_err(|_| DomainError::PolicyLifecycleUnavailable)?;
        let evaluation: EvaluationOutcome = self.evaluator.evaluate(&policies, request.resource_id).await;
        let (effect, matched_policy_id) = combine(&evaluation, effective_config.default_posture);

        self.cache.insert(cache_key, effect, matched_policy_id);
        let outcome = DecisionOutcome { effect, matched_policy_id, cached: false };
        self.audit(tenant_id, &request, &outcome, "evaluated").await?;
        Ok(outcome)
    }

    async fn first_missing_required_attribute(&self, scope: &AccessScope, request: &DecisionRequest) -> Option<String> {
        let pip_cache = self.client_hub.get::<dyn PipCacheClient>().ok()?;
        for required in &request.required_attributes {
            match pip_cache.lookup(scope, required.connection_id, &required.attribute_path).await {
                Ok(pip_cache::domain::LookupOutcome::Missing) => return Some(required.attribute_path.clone()),
                Ok(_) | Err(_) => continue,
            }
        }
        None
    }

    async fn audit(&self, tenant_id: Uuid, request: &DecisionRequest, outcome: &DecisionOutcome, stage: &str) -> Result<(), DomainError> {
        let audit_sink = self.client_hub.get::<dyn AuditSinkClient>().map_err(|_| DomainError::AuditSinkUnavailable)?;
        let entry = NewAuditEntry {
            tenant_id,
            producer: "decision-engine".to_owned(),
            kind: "decision".to_owned(),
            payload: serde_json::json!({
                "stage": stage,
                "pep_id": request.pep_id,
                "resource_id": request.resource_id,
                "action": request.action,
                "effect": outcome.effect.as_str(),
                "matched_policy_id": outcome.matched_policy_id,
                "cached": outcome.cached,
            }),
            request_id: None,
        };
        audit_sink.record(entry).await.map_err(|_| DomainError::AuditSinkUnavailable)
    }
}

fn canonical_hash(value: &serde_json::Value) -> String {
    let canonical = serde_json::to_string(value).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cc_security::SecurityContext;

    use super::*;
    use crate::domain::evaluator::ReferenceEvaluator;

    fn service() -> Service {
        Service::new(Arc::new(ClientHub::new()), Arc::new(ReferenceEvaluator), Duration::from_secs(30))
    }

    fn request() -> DecisionRequest {
        DecisionRequest {
            pep_id: Uuid::new_v4(),
            mode: pep_config::domain::DeploymentMode::Sidecar,
            subject: serde_json::json!({"id": "user-1"}),
            resource_id: Uuid::new_v4(),
            action: "read".to_owned(),
            context: serde_json::json!({}),
            required_attributes: vec![],
        }
    }

    #[tokio::test]
    async fn system_administrator_bypasses_the_evaluator_and_bundle_lookup() {
        let service = service();
        let principal = Principal::SystemAdmin { tenant_id: Uuid::new_v4() };

        let error = service.decide(&principal, Environment::Sandbox, request()).await.unwrap_err();
        assert!(matches!(error, DomainError::AuditSinkUnavailable));
    }

    #[tokio::test]
    async fn a_non_admin_decision_requires_bundle_builder_to_be_registered() {
        let service = service();
        let tenant_id = Uuid::new_v4();
        let principal = Principal::Subject(SecurityContext::builder(Uuid::new_v4(), tenant_id, Environment::Sandbox).build());

        let error = service.decide(&principal, Environment::Sandbox, request()).await.unwrap_err();
        assert!(matches!(error, DomainError::BundleBuilderUnavailable));
    }

    #[test]
    fn required_attribute_requests_deserialize_with_an_empty_default() {
        let req: DecisionRequest = serde_json::from_value(serde_json::json!({
            "pep_id": Uuid::new_v4(),
            "mode": "sidecar",
            "subject": {},
            "resource_id": Uuid::new_v4(),
            "action": "read",
        }))
        .unwrap();
        assert!(req.required_attributes.is_empty());
    }
}
