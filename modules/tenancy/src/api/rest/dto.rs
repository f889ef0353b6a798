use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Tenant;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateTenantRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TenantResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub suspended: bool,
}

impl From<Tenant> for TenantResponse {
    fn from(t: Tenant) -> Self {
        Self { id: t.id, name: t.name, slug: t.slug, suspended: t.suspended }
    }
}
