use async_trait::async_trait;
use policy_lifecycle::domain::Policy;
use uuid::Uuid;

use super::model::{EvaluationOutcome, MatchedPolicy, matches};

/// Seam between the combination algorithm and the policy source a
/// bundle's modules are written in. The reference implementation
/// below is the only evaluator this workspace ships; a future
/// policy-language interpreter would be a second implementation of
/// this trait, not a change to `Service`.
#[async_trait]
pub trait PolicyEvaluator: Send + Sync {
    async fn evaluate(&self, policies: &[Policy], resource_id: Uuid) -> EvaluationOutcome;
}

/// Matches policies by target resource set only. `Policy::source` is
/// opaque policy-language text this workspace has no interpreter for;
/// until one exists, a policy's effect applies unconditionally to
/// every resource it targets.
pub struct ReferenceEvaluator;

#[async_trait]
impl PolicyEvaluator for ReferenceEvaluator {
    async fn evaluate(&self, policies: &[Policy], resource_id: Uuid) -> EvaluationOutcome {
        let matches = policies
            .iter()
            .filter(|policy| matches(policy, resource_id))
            .map(|policy| MatchedPolicy { policy_id: policy.id, effect: policy.effect })
            .collect();
        EvaluationOutcome { matches }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cc_security::Environment;
    use policy_lifecycle::domain::PolicyEffect;

    use super::*;

    #[tokio::test]
    async fn only_policies_targeting_the_resource_are_returned() {
        let resource_id = Uuid::new_v4();
        let mut targeted = Policy::draft(Uuid::new_v4(), Environment::Sandbox, "targeted".to_owned(), String::new(), String::new(), vec![resource_id], PolicyEffect::Deny);
        targeted.id = Uuid::new_v4();
        let untargeted =
            Policy::draft(Uuid::new_v4(), Environment::Sandbox, "untargeted".to_owned(), String::new(), String::new(), vec![Uuid::new_v4()], PolicyEffect::Permit);

        let outcome = ReferenceEvaluator.evaluate(&[targeted.clone(), untargeted], resource_id).await;
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].policy_id, targeted.id);
    }
}
