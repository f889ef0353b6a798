use cc_security::Environment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PolicyEffect {
    Permit,
    Deny,
    Advice,
}

impl PolicyEffect {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyEffect::Permit => "permit",
            PolicyEffect::Deny => "deny",
            PolicyEffect::Advice => "advice",
        }
    }
}

impl std::str::FromStr for PolicyEffect {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permit" => Ok(PolicyEffect::Permit),
            "deny" => Ok(PolicyEffect::Deny),
            "advice" => Ok(PolicyEffect::Advice),
            other => Err(InvalidEnumValue(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PolicyFolder {
    Enabled,
    Disabled,
    Drafts,
}

impl PolicyFolder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyFolder::Enabled => "enabled",
            PolicyFolder::Disabled => "disabled",
            PolicyFolder::Drafts => "drafts",
        }
    }
}

impl std::str::FromStr for PolicyFolder {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(PolicyFolder::Enabled),
            "disabled" => Ok(PolicyFolder::Disabled),
            "drafts" => Ok(PolicyFolder::Drafts),
            other => Err(InvalidEnumValue(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PromotionStatus {
    NotPromoted,
    Pending,
    Active,
    Retired,
}

impl PromotionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PromotionStatus::NotPromoted => "not-promoted",
            PromotionStatus::Pending => "pending",
            PromotionStatus::Active => "active",
            PromotionStatus::Retired => "retired",
        }
    }
}

impl std::str::FromStr for PromotionStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-promoted" => Ok(PromotionStatus::NotPromoted),
            "pending" => Ok(PromotionStatus::Pending),
            "active" => Ok(PromotionStatus::Active),
            "retired" => Ok(PromotionStatus::Retired),
            other => Err(InvalidEnumValue(other.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid enumerated value: {0}")]
pub struct InvalidEnumValue(String);

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Policy {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: Environment,
    pub name: String,
    pub description: String,
    pub source: String,
    pub target_resource_ids: Vec<Uuid>,
    pub effect: PolicyEffect,
    pub folder: PolicyFolder,
    pub sandbox_status: PromotionStatus,
    pub production_status: PromotionStatus,
    pub promoted_from_sandbox: bool,
    pub promoted_at: Option<DateTime<Utc>>,
    pub promoted_by: Option<Uuid>,
    pub sandbox_ancestor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Policy {
    #[must_use]
    pub fn draft(tenant_id: Uuid, environment: Environment, name: String, description: String, source: String, target_resource_ids: Vec<Uuid>, effect: PolicyEffect) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            environment,
            name,
            description,
            source,
            target_resource_ids,
            effect,
            folder: PolicyFolder::Drafts,
            sandbox_status: PromotionStatus::NotPromoted,
            production_status: PromotionStatus::NotPromoted,
            promoted_from_sandbox: false,
            promoted_at: None,
            promoted_by: None,
            sandbox_ancestor_id: None,
            created_at: Utc::now(),
        }
    }
}

/// A patch applied to a policy on `update`; `None` leaves the field
/// untouched.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct PolicyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub target_resource_ids: Option<Vec<Uuid>>,
    pub effect: Option<PolicyEffect>,
    pub folder: Option<PolicyFolder>,
}

/// Immutable, public, no tenant scope. `instantiate` copies `source`
/// and `parameters` into a new [`Policy`] owned by the caller's tenant.
#[derive(Debug, Clone)]
pub struct PolicyTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub risk_level: &'static str,
    pub compliance_tags: &'static [&'static str],
    pub source: &'static str,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PolicyConflict {
    pub policy_id: Uuid,
    pub other_policy_id: Uuid,
    pub reason: String,
}
