use cc_errors::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("policy-lifecycle client unavailable")]
    PolicyLifecycleUnavailable,
    #[error("pep-config client unavailable")]
    PepConfigUnavailable,
    #[error("bundle-builder client unavailable")]
    BundleBuilderUnavailable,
    #[error("audit-sink client unavailable")]
    AuditSinkUnavailable,
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::PolicyLifecycleUnavailable | DomainError::PepConfigUnavailable | DomainError::BundleBuilderUnavailable | DomainError::AuditSinkUnavailable => {
                ErrorKind::UpstreamFailure
            }
        }
    }
}
