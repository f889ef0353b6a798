use std::sync::Arc;

use axum::{Extension, Json, Router, extract::Query, response::IntoResponse};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{AccessScope, Principal};
use serde::{Deserialize, Serialize};
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{AuditEntry, DomainError, Service};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuditEntryResponse {
    pub id: Uuid,
    pub producer: String,
    pub sequence: i64,
    pub kind: String,
    pub payload: serde_json::Value,
    pub request_id: Option<String>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

impl From<AuditEntry> for AuditEntryResponse {
    fn from(e: AuditEntry) -> Self {
        Self {
            id: e.id,
            producer: e.producer,
            sequence: e.sequence,
            kind: e.kind,
            payload: e.payload,
            request_id: e.request_id,
            recorded_at: e.recorded_at,
        }
    }
}

fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

async fn list_audit_logs(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.list(&scope, query.skip, query.limit).await {
        Ok(entries) => {
            Json(entries.into_iter().map(AuditEntryResponse::from).collect::<Vec<_>>()).into_response()
        }
        Err(err) => to_problem(&err, "/audit/logs").into_response(),
    }
}

fn principal_environment(principal: &Principal) -> cc_security::Environment {
    match principal {
        Principal::Subject(ctx) => ctx.environment,
        Principal::SystemAdmin { .. } => cc_security::Environment::Production,
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::get("/audit/logs")
        .operation_id("list_audit_logs")
        .summary("List audit log entries for the caller's tenant")
        .tag("audit")
        .authenticated()
        .handler(list_audit_logs)
        .register(router, openapi);

    router.layer(Extension(service))
}
