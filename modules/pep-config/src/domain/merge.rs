use super::model::{DeploymentMode, EffectiveConfig, GlobalPepConfig, IndividualPepConfig};

/// Picks the individual override when present, else the global
/// default, then drops every key that does not apply to `mode`.
/// Deterministic and side-effect free: the same two rows and mode
/// always produce the same result.
#[must_use]
pub fn merge_effective_config(global: &GlobalPepConfig, individual: Option<&IndividualPepConfig>, mode: DeploymentMode) -> EffectiveConfig {
    let poll_interval_seconds = individual.and_then(|i| i.poll_interval_seconds).unwrap_or(global.poll_interval_seconds);
    let decision_log_batch_size = individual.and_then(|i| i.decision_log_batch_size).unwrap_or(global.decision_log_batch_size);
    let fail_policy = individual.and_then(|i| i.fail_policy).unwrap_or(global.fail_policy);
    let default_posture = individual.and_then(|i| i.default_posture).unwrap_or(global.default_posture);
    let tls_enabled = individual.and_then(|i| i.tls_enabled).unwrap_or(global.tls_enabled);

    let (sidecar_port, sidecar_traffic_mode, sidecar_cpu_limit, sidecar_memory_limit) = if mode == DeploymentMode::Sidecar {
        (
            Some(individual.and_then(|i| i.sidecar_port).unwrap_or(global.sidecar_port)),
            Some(individual.and_then(|i| i.sidecar_traffic_mode).unwrap_or(global.sidecar_traffic_mode)),
            Some(individual.and_then(|i| i.sidecar_cpu_limit.clone()).unwrap_or_else(|| global.sidecar_cpu_limit.clone())),
            Some(individual.and_then(|i| i.sidecar_memory_limit.clone()).unwrap_or_else(|| global.sidecar_memory_limit.clone())),
        )
    } else {
        (None, None, None, None)
    };

    let (reverse_proxy_upstream_url, reverse_proxy_timeout_seconds, reverse_proxy_public_url) = if mode == DeploymentMode::ReverseProxy {
        (
            individual.and_then(|i| i.reverse_proxy_upstream_url.clone()).or_else(|| global.reverse_proxy_upstream_url.clone()),
            Some(individual.and_then(|i| i.reverse_proxy_timeout_seconds).unwrap_or(global.reverse_proxy_timeout_seconds)),
            individual.and_then(|i| i.reverse_proxy_public_url.clone()).or_else(|| global.reverse_proxy_public_url.clone()),
        )
    } else {
        (None, None, None)
    };

    EffectiveConfig {
        poll_interval_seconds,
        decision_log_batch_size,
        fail_policy,
        default_posture,
        tls_enabled,
        sidecar_port,
        sidecar_traffic_mode,
        sidecar_cpu_limit,
        sidecar_memory_limit,
        reverse_proxy_upstream_url,
        reverse_proxy_timeout_seconds,
        reverse_proxy_public_url,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{FailPolicy, TrafficMode};
    use cc_security::Environment;
    use uuid::Uuid;

    fn global() -> GlobalPepConfig {
        GlobalPepConfig::defaults(Uuid::new_v4(), Environment::Sandbox)
    }

    #[test]
    fn individual_override_wins_over_global_default() {
        let global = global();
        let individual = IndividualPepConfig { pep_id: Uuid::new_v4(), poll_interval_seconds: Some(60), ..Default::default() };
        let effective = merge_effective_config(&global, Some(&individual), DeploymentMode::Mcp);
        assert_eq!(effective.poll_interval_seconds, 60);
    }

    #[test]
    fn absent_override_falls_back_to_global_default() {
        let global = global();
        let individual = IndividualPepConfig { pep_id: Uuid::new_v4(), ..Default::default() };
        let effective = merge_effective_config(&global, Some(&individual), DeploymentMode::Mcp);
        assert_eq!(effective.poll_interval_seconds, global.poll_interval_seconds);
    }

    #[test]
    fn sidecar_keys_never_appear_for_a_reverse_proxy_pep() {
        let global = global();
        let effective = merge_effective_config(&global, None, DeploymentMode::ReverseProxy);
        assert!(effective.sidecar_port.is_none());
        assert!(effective.sidecar_traffic_mode.is_none());
        assert!(effective.reverse_proxy_timeout_seconds.is_some());
    }

    #[test]
    fn reverse_proxy_keys_never_appear_for_a_sidecar_pep() {
        let global = global();
        let effective = merge_effective_config(&global, None, DeploymentMode::Sidecar);
        assert!(effective.reverse_proxy_upstream_url.is_none());
        assert!(effective.reverse_proxy_timeout_seconds.is_none());
        assert_eq!(effective.sidecar_traffic_mode, Some(TrafficMode::Inline));
    }

    #[test]
    fn mcp_mode_drops_both_mode_specific_groups() {
        let global = global();
        let effective = merge_effective_config(&global, None, DeploymentMode::Mcp);
        assert!(effective.sidecar_port.is_none());
        assert!(effective.reverse_proxy_upstream_url.is_none() && effective.reverse_proxy_timeout_seconds.is_none());
    }

    #[test]
    fn merge_is_deterministic_for_identical_inputs() {
        let global = global();
        let individual = IndividualPepConfig { pep_id: Uuid::new_v4(), fail_policy: Some(FailPolicy::FailOpen), ..Default::default() };
        let first = merge_effective_config(&global, Some(&individual), DeploymentMode::Sidecar);
        let second = merge_effective_config(&global, Some(&individual), DeploymentMode::Sidecar);
        assert_eq!(first, second);
    }
}
