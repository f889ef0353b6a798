use policy_lifecycle::domain::{Policy, PolicyEffect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pep_config::domain::DeploymentMode;

/// A request has already had its subject and resource resolved to
/// stable identifiers by the caller (the resource via `resources`'
/// fingerprint-and-register step) before it reaches the engine: the
/// engine's job is combining policy effects, not identity resolution.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct DecisionRequest {
    pub pep_id: Uuid,
    pub mode: DeploymentMode,
    pub subject: serde_json::Value,
    pub resource_id: Uuid,
    pub action: String,
    #[serde(default)]
    pub context: serde_json::Value,
    /// Attributes the evaluator treats as mandatory for this request;
    /// if any resolves to [`pip_cache::domain::LookupOutcome::Missing`]
    /// the decision falls back to the PEP's `fail_policy` without
    /// running the evaluator.
    #[serde(default)]
    pub required_attributes: Vec<RequiredAttribute>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RequiredAttribute {
    pub connection_id: Uuid,
    pub attribute_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionEffect {
    Permit,
    Deny,
}

impl DecisionEffect {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionEffect::Permit => "permit",
            DecisionEffect::Deny => "deny",
        }
    }
}

/// Reserved policy identifier stamped on a system-administrator
/// bypass: never produced by a real policy row, so it is unambiguous
/// in the audit trail.
pub const SYSTEM_ADMIN_POLICY_ID: Uuid = Uuid::nil();

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DecisionOutcome {
    pub effect: DecisionEffect,
    pub matched_policy_id: Option<Uuid>,
    pub cached: bool,
}

/// A policy whose target resource set includes the requested resource,
/// paired with the effect it contributes.
pub struct MatchedPolicy {
    pub policy_id: Uuid,
    pub effect: PolicyEffect,
}

/// What the evaluator hands back before combination: every policy that
/// applies to the requested resource, in no particular order.
pub struct EvaluationOutcome {
    pub matches: Vec<MatchedPolicy>,
}

/// Combines matched effects deny-overrides, then permit, then the
/// tenant's default posture. Pure and independent of how the matches
/// were produced, so the same function backs both a cache hit's
/// recomputation-free path and a fresh evaluation.
#[must_use]
pub fn combine(outcome: &EvaluationOutcome, default_posture: pep_config::domain::SecurityPosture) -> (DecisionEffect, Option<Uuid>) {
    if let Some(deny) = outcome.matches.iter().find(|m| m.effect == PolicyEffect::Deny) {
        return (DecisionEffect::Deny, Some(deny.policy_id));
    }
    if let Some(permit) = outcome.matches.iter().find(|m| m.effect == PolicyEffect::Permit) {
        return (DecisionEffect::Permit, Some(permit.policy_id));
    }
    let effect = match default_posture {
        pep_config::domain::SecurityPosture::Permit => DecisionEffect::Permit,
        pep_config::domain::SecurityPosture::Deny => DecisionEffect::Deny,
    };
    (effect, None)
}

/// A policy matches a request when it applies to every resource
/// (`target_resource_ids` empty) or explicitly lists the requested
/// resource. Policies carry no action or subject filter of their own
/// in this corpus: `source` is the policy-language body, interpreted
/// by a policy engine outside this crate's scope.
#[must_use]
pub fn matches(policy: &Policy, resource_id: Uuid) -> bool {
    policy.target_resource_ids.is_empty() || policy.target_resource_ids.contains(&resource_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn policy(effect: PolicyEffect) -> Policy {
        Policy::draft(Uuid::new_v4(), cc_security::Environment::Sandbox, "p".to_owned(), String::new(), String::new(), vec![], effect)
    }

    #[test]
    fn deny_wins_over_permit() {
        let outcome = EvaluationOutcome {
            matches: vec![
                MatchedPolicy { policy_id: Uuid::new_v4(), effect: PolicyEffect::Permit },
                MatchedPolicy { policy_id: Uuid::new_v4(), effect: PolicyEffect::Deny },
            ],
        };
        let (effect, _) = combine(&outcome, pep_config::domain::SecurityPosture::Permit);
        assert_eq!(effect, DecisionEffect::Deny);
    }

    #[test]
    fn permit_wins_absent_a_deny() {
        let outcome = EvaluationOutcome { matches: vec![MatchedPolicy { policy_id: Uuid::new_v4(), effect: PolicyEffect::Permit }] };
        let (effect, _) = combine(&outcome, pep_config::domain::SecurityPosture::Deny);
        assert_eq!(effect, DecisionEffect::Permit);
    }

    #[test]
    fn default_posture_applies_absent_any_match() {
        let outcome = EvaluationOutcome { matches: vec![] };
        let (effect, policy_id) = combine(&outcome, pep_config::domain::SecurityPosture::Deny);
        assert_eq!(effect, DecisionEffect::Deny);
        assert!(policy_id.is_none());
    }

    #[test]
    fn advice_alone_falls_through_to_default_posture() {
        let outcome = EvaluationOutcome { matches: vec![MatchedPolicy { policy_id: Uuid::new_v4(), effect: PolicyEffect::Advice }] };
        let (effect, _) = combine(&outcome, pep_config::domain::SecurityPosture::Permit);
        assert_eq!(effect, DecisionEffect::Permit);
    }

    #[test]
    fn empty_target_set_matches_every_resource() {
        let policy = policy(PolicyEffect::Deny);
        assert!(matches(&policy, Uuid::new_v4()));
    }

    #[test]
    fn nonempty_target_set_matches_only_listed_resources() {
        let resource_id = Uuid::new_v4();
        let mut policy = policy(PolicyEffect::Deny);
        policy.target_resource_ids = vec![resource_id];
        assert!(matches(&policy, resource_id));
        assert!(!matches(&policy, Uuid::new_v4()));
    }
}
