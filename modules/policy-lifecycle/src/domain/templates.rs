use super::model::PolicyTemplate;

/// The read-mostly template corpus: public, unauthenticated, immutable.
/// Kept as a static table rather than a database-backed one because
/// nothing here is tenant-owned or ever mutated in place.
pub const TEMPLATES: &[PolicyTemplate] = &[
    PolicyTemplate {
        id: "deny-after-hours-admin",
        name: "Deny admin actions outside business hours",
        category: "access-control",
        risk_level: "high",
        compliance_tags: &["soc2", "iso27001"],
        source: "package control_core.templates.deny_after_hours_admin\n\ndefault allow = false\n",
    },
    PolicyTemplate {
        id: "require-mfa-for-sensitive-resources",
        name: "Require MFA for sensitive resource access",
        category: "authentication",
        risk_level: "high",
        compliance_tags: &["soc2", "pci-dss"],
        source: "package control_core.templates.require_mfa\n\ndefault allow = false\n",
    },
    PolicyTemplate {
        id: "allow-read-only-service-accounts",
        name: "Allow read-only access for service accounts",
        category: "access-control",
        risk_level: "low",
        compliance_tags: &["soc2"],
        source: "package control_core.templates.readonly_service_accounts\n\ndefault allow = false\n",
    },
];

#[must_use]
pub fn find(id: &str) -> Option<&'static PolicyTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}
