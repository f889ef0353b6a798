use std::sync::Arc;

use axum::{Extension, Json, Router, extract::Path, http::StatusCode, response::IntoResponse};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{AccessScope, Principal};
use serde::{Deserialize, Serialize};
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{DomainError, Resource, Service};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterResourceRequest {
    pub kind: String,
    pub external_id: String,
    pub display_name: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ResourceResponse {
    pub id: Uuid,
    pub kind: String,
    pub external_id: String,
    pub display_name: String,
    pub fingerprint: String,
}

impl From<Resource> for ResourceResponse {
    fn from(r: Resource) -> Self {
        Self { id: r.id, kind: r.kind, external_id: r.external_id, display_name: r.display_name, fingerprint: r.fingerprint }
    }
}

fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

async fn register_resource(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<RegisterResourceRequest>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.register(&scope, body.kind, body.external_id, body.display_name, body.attributes).await {
        Ok(resource) => Json(ResourceResponse::from(resource)).into_response(),
        Err(err) => to_problem(&err, "/resources").into_response(),
    }
}

async fn get_resource(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.get(&scope, id).await {
        Ok(resource) => Json(ResourceResponse::from(resource)).into_response(),
        Err(err) => to_problem(&err, &format!("/resources/{id}")).into_response(),
    }
}

fn principal_environment(principal: &Principal) -> cc_security::Environment {
    match principal {
        Principal::Subject(ctx) => ctx.environment,
        Principal::SystemAdmin { .. } => cc_security::Environment::Production,
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::post("/resources")
        .operation_id("register_resource")
        .summary("Register or upsert a protected resource")
        .tag("resources")
        .authenticated()
        .error(StatusCode::UNPROCESSABLE_ENTITY)
        .handler(register_resource)
        .register(router, openapi);

    let router = OperationBuilder::get("/resources/{id}")
        .operation_id("get_resource")
        .summary("Fetch a protected resource by id")
        .tag("resources")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .handler(get_resource)
        .register(router, openapi);

    router.layer(Extension(service))
}
