use cc_security::AccessScope;
use uuid::Uuid;

use super::error::DomainError;
use super::merge::merge_effective_config;
use super::model::{DeploymentMode, EffectiveConfig, GlobalPepConfig, IndividualPepConfig};
use crate::infra::repository::Repository;

#[derive(Clone)]
pub struct Service {
    repository: Repository,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_or_create_global(&self, scope: &AccessScope) -> Result<GlobalPepConfig, DomainError> {
        self.repository.get_or_create_global(scope).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_global(&self, scope: &AccessScope, config: GlobalPepConfig) -> Result<GlobalPepConfig, DomainError> {
        validate_global(&config)?;
        self.repository.put_global(scope, config).await
    }

    pub async fn get_individual(&self, pep_id: Uuid) -> Result<Option<IndividualPepConfig>, DomainError> {
        self.repository.get_individual(pep_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_individual(&self, config: IndividualPepConfig) -> Result<IndividualPepConfig, DomainError> {
        validate_individual(&config)?;
        self.repository.put_individual(config).await
    }

    pub async fn effective_config(&self, scope: &AccessScope, pep_id: Uuid, mode: DeploymentMode) -> Result<EffectiveConfig, DomainError> {
        let global = self.repository.get_or_create_global(scope).await?;
        let individual = self.repository.get_individual(pep_id).await?;
        Ok(merge_effective_config(&global, individual.as_ref(), mode))
    }
}

fn validate_global(config: &GlobalPepConfig) -> Result<(), DomainError> {
    if !(10..=300).contains(&config.poll_interval_seconds) {
        return Err(DomainError::InvalidPollInterval);
    }
    validate_port(config.sidecar_port)?;
    validate_cpu(&config.sidecar_cpu_limit)?;
    validate_memory(&config.sidecar_memory_limit)
}

fn validate_individual(config: &IndividualPepConfig) -> Result<(), DomainError> {
    if let Some(interval) = config.poll_interval_seconds {
        if !(10..=300).contains(&interval) {
            return Err(DomainError::InvalidPollInterval);
        }
    }
    if let Some(port) = config.sidecar_port {
        validate_port(port)?;
    }
    if let Some(cpu) = &config.sidecar_cpu_limit {
        validate_cpu(cpu)?;
    }
    if let Some(memory) = &config.sidecar_memory_limit {
        validate_memory(memory)?;
    }
    Ok(())
}

fn validate_port(port: i32) -> Result<(), DomainError> {
    if (1..=65535).contains(&port) { Ok(()) } else { Err(DomainError::InvalidPort) }
}

fn validate_cpu(value: &str) -> Result<(), DomainError> {
    let digits = value.strip_suffix('m').unwrap_or(value);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) { Ok(()) } else { Err(DomainError::InvalidCpuLimit) }
}

fn validate_memory(value: &str) -> Result<(), DomainError> {
    let digits = value.strip_suffix("Mi").or_else(|| value.strip_suffix("Gi"));
    match digits {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => Ok(()),
        _ => Err(DomainError::InvalidMemoryLimit),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_poll_interval_outside_10_to_300() {
        let mut config = GlobalPepConfig::defaults(Uuid::new_v4(), cc_security::Environment::Sandbox);
        config.poll_interval_seconds = 5;
        assert!(matches!(validate_global(&config), Err(DomainError::InvalidPollInterval)));
    }

    #[test]
    fn rejects_out_of_range_port() {
        let mut config = GlobalPepConfig::defaults(Uuid::new_v4(), cc_security::Environment::Sandbox);
        config.sidecar_port = 70000;
        assert!(matches!(validate_global(&config), Err(DomainError::InvalidPort)));
    }

    #[test]
    fn accepts_millicpu_and_plain_cpu_formats() {
        assert!(validate_cpu("250m").is_ok());
        assert!(validate_cpu("2").is_ok());
        assert!(validate_cpu("two").is_err());
    }

    #[test]
    fn accepts_mi_and_gi_memory_formats() {
        assert!(validate_memory("256Mi").is_ok());
        assert!(validate_memory("2Gi").is_ok());
        assert!(validate_memory("256").is_err());
    }
}
