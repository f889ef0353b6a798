use std::collections::HashSet;

use super::model::{Policy, PolicyConflict, PolicyEffect, PolicyFolder};

/// Advisory scan over the already-enabled policies in the same
/// tenant/environment: two `deny` rules targeting the same resource
/// are flagged, and a policy that names itself as a target (a
/// malformed target set, but possible if entered by hand) is flagged
/// as a cyclic reference. Never blocks a save; callers surface this as
/// a warning list.
#[must_use]
pub fn conflict_check(candidate: &Policy, others: &[Policy]) -> Vec<PolicyConflict> {
    let candidate_targets: HashSet<_> = candidate.target_resource_ids.iter().collect();
    let mut conflicts = Vec::new();

    if candidate.target_resource_ids.contains(&candidate.id) {
        conflicts.push(PolicyConflict {
            policy_id: candidate.id,
            other_policy_id: candidate.id,
            reason: "policy targets itself, forming a cyclic reference".to_owned(),
        });
    }

    for other in others {
        if other.id == candidate.id || other.folder != PolicyFolder::Enabled {
            continue;
        }
        let overlaps = other.target_resource_ids.iter().any(|id| candidate_targets.contains(id));
        if !overlaps {
            continue;
        }
        if candidate.effect == PolicyEffect::Deny && other.effect == PolicyEffect::Deny {
            conflicts.push(PolicyConflict {
                policy_id: candidate.id,
                other_policy_id: other.id,
                reason: "two deny-effect policies target the same resource".to_owned(),
            });
        }
    }

    conflicts
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::model::PromotionStatus;

    fn policy(id: Uuid, targets: Vec<Uuid>, effect: PolicyEffect, folder: PolicyFolder) -> Policy {
        Policy {
            id,
            tenant_id: Uuid::new_v4(),
            environment: cc_security::Environment::Sandbox,
            name: "p".to_owned(),
            description: String::new(),
            source: "package p\n".to_owned(),
            target_resource_ids: targets,
            effect,
            folder,
            sandbox_status: PromotionStatus::NotPromoted,
            production_status: PromotionStatus::NotPromoted,
            promoted_from_sandbox: false,
            promoted_at: None,
            promoted_by: None,
            sandbox_ancestor_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn flags_two_deny_policies_on_the_same_resource() {
        let resource = Uuid::new_v4();
        let candidate = policy(Uuid::new_v4(), vec![resource], PolicyEffect::Deny, PolicyFolder::Enabled);
        let other = policy(Uuid::new_v4(), vec![resource], PolicyEffect::Deny, PolicyFolder::Enabled);
        assert_eq!(conflict_check(&candidate, &[other]).len(), 1);
    }

    #[test]
    fn does_not_flag_permit_and_deny_on_the_same_resource() {
        let resource = Uuid::new_v4();
        let candidate = policy(Uuid::new_v4(), vec![resource], PolicyEffect::Deny, PolicyFolder::Enabled);
        let other = policy(Uuid::new_v4(), vec![resource], PolicyEffect::Permit, PolicyFolder::Enabled);
        assert!(conflict_check(&candidate, &[other]).is_empty());
    }

    #[test]
    fn ignores_disabled_policies() {
        let resource = Uuid::new_v4();
        let candidate = policy(Uuid::new_v4(), vec![resource], PolicyEffect::Deny, PolicyFolder::Enabled);
        let other = policy(Uuid::new_v4(), vec![resource], PolicyEffect::Deny, PolicyFolder::Disabled);
        assert!(conflict_check(&candidate, &[other]).is_empty());
    }

    #[test]
    fn flags_self_referencing_target_as_cyclic() {
        let id = Uuid::new_v4();
        let candidate = policy(id, vec![id], PolicyEffect::Permit, PolicyFolder::Enabled);
        assert_eq!(conflict_check(&candidate, &[]).len(), 1);
    }
}
