use std::sync::Arc;

use axum::{Extension, Json, Router, extract::Path, http::StatusCode, response::IntoResponse};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{AccessScope, Principal};
use serde::{Deserialize, Serialize};
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{DomainError, PolicyEffect, PolicyPatch, Service};

const PRODUCTION_WRITE_SCOPE: &str = "policy:write-production";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePolicyRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub target_resource_ids: Vec<Uuid>,
    pub effect: PolicyEffect,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TemplateResponse {
    pub id: String,
    pub name: String,
    pub category: String,
    pub risk_level: String,
    pub compliance_tags: Vec<String>,
}

fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

fn principal_environment(principal: &Principal) -> cc_security::Environment {
    match principal {
        Principal::Subject(ctx) => ctx.environment,
        Principal::SystemAdmin { .. } => cc_security::Environment::Production,
    }
}

fn production_write_allowed(principal: &Principal) -> bool {
    match principal {
        Principal::SystemAdmin { .. } => true,
        Principal::Subject(ctx) => ctx.has_scope(PRODUCTION_WRITE_SCOPE),
    }
}

async fn create_policy(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreatePolicyRequest>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.create(&scope, body.name, body.description, body.source, body.target_resource_ids, body.effect).await {
        Ok(policy) => (StatusCode::CREATED, Json(policy)).into_response(),
        Err(err) => to_problem(&err, "/policies").into_response(),
    }
}

async fn update_policy(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PolicyPatch>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.update(&scope, id, patch, production_write_allowed(&principal)).await {
        Ok(policy) => Json(policy).into_response(),
        Err(err) => to_problem(&err, &format!("/policies/{id}")).into_response(),
    }
}

async fn promote_policy(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.promote(&scope, id, principal.tenant_id()).await {
        Ok(policy) => Json(policy).into_response(),
        Err(err) => to_problem(&err, &format!("/policies/{id}/promote")).into_response(),
    }
}

async fn retire_policy(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.retire(&scope, id).await {
        Ok(policy) => Json(policy).into_response(),
        Err(err) => to_problem(&err, &format!("/policies/{id}/retire")).into_response(),
    }
}

async fn get_policy(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.get(&scope, id).await {
        Ok(policy) => Json(policy).into_response(),
        Err(err) => to_problem(&err, &format!("/policies/{id}")).into_response(),
    }
}

async fn list_policies(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.list(&scope).await {
        Ok(policies) => Json(policies).into_response(),
        Err(err) => to_problem(&err, "/policies").into_response(),
    }
}

async fn conflict_check(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    let candidate = match service.get(&scope, id).await {
        Ok(policy) => policy,
        Err(err) => return to_problem(&err, &format!("/policies/{id}/conflicts")).into_response(),
    };
    match service.conflict_check(&scope, &candidate).await {
        Ok(conflicts) => Json(conflicts).into_response(),
        Err(err) => to_problem(&err, &format!("/policies/{id}/conflicts")).into_response(),
    }
}

async fn list_templates(Extension(service): Extension<Arc<Service>>) -> impl IntoResponse {
    let templates = service
        .list_templates()
        .iter()
        .map(|t| TemplateResponse {
            id: t.id.to_owned(),
            name: t.name.to_owned(),
            category: t.category.to_owned(),
            risk_level: t.risk_level.to_owned(),
            compliance_tags: t.compliance_tags.iter().map(|s| (*s).to_owned()).collect(),
        })
        .collect::<Vec<_>>();
    Json(templates)
}

async fn instantiate_template(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(template_id): Path<String>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.instantiate_template(&scope, &template_id).await {
        Ok(policy) => (StatusCode::CREATED, Json(policy)).into_response(),
        Err(err) => to_problem(&err, &format!("/policy-templates/{template_id}/instantiate")).into_response(),
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::post("/policies")
        .operation_id("create_policy")
        .summary("Create a draft policy")
        .tag("policy-lifecycle")
        .authenticated()
        .error(StatusCode::UNPROCESSABLE_ENTITY)
        .handler(create_policy)
        .register(router, openapi);

    let router = OperationBuilder::patch("/policies/{id}")
        .operation_id("update_policy")
        .summary("Update a policy; rejected on a production-locked row without the write capability")
        .tag("policy-lifecycle")
        .authenticated()
        .error(StatusCode::FORBIDDEN)
        .handler(update_policy)
        .register(router, openapi);

    let router = OperationBuilder::post("/policies/{id}/promote")
        .operation_id("promote_policy")
        .summary("Atomically promote a sandbox policy to production")
        .tag("policy-lifecycle")
        .authenticated()
        .error(StatusCode::CONFLICT)
        .handler(promote_policy)
        .register(router, openapi);

    let router = OperationBuilder::post("/policies/{id}/retire")
        .operation_id("retire_policy")
        .summary("Retire a policy, excluding it from future bundles")
        .tag("policy-lifecycle")
        .authenticated()
        .error(StatusCode::CONFLICT)
        .handler(retire_policy)
        .register(router, openapi);

    let router = OperationBuilder::get("/policies/{id}")
        .operation_id("get_policy")
        .summary("Fetch a policy by id")
        .tag("policy-lifecycle")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .handler(get_policy)
        .register(router, openapi);

    let router = OperationBuilder::get("/policies")
        .operation_id("list_policies")
        .summary("List policies for the caller's tenant and environment")
        .tag("policy-lifecycle")
        .authenticated()
        .handler(list_policies)
        .register(router, openapi);

    let router = OperationBuilder::get("/policies/{id}/conflicts")
        .operation_id("check_policy_conflicts")
        .summary("Advisory scan for overlapping-resource conflicts; never blocks a save")
        .tag("policy-lifecycle")
        .authenticated()
        .handler(conflict_check)
        .register(router, openapi);

    let router = OperationBuilder::get("/policy-templates")
        .operation_id("list_policy_templates")
        .summary("List the public, unauthenticated policy template corpus")
        .tag("policy-lifecycle")
        .handler(list_templates)
        .register(router, openapi);

    let router = OperationBuilder::post("/policy-templates/{template_id}/instantiate")
        .operation_id("instantiate_policy_template")
        .summary("Instantiate a template into a draft policy in the caller's tenant and sandbox environment")
        .tag("policy-lifecycle")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .handler(instantiate_template)
        .register(router, openapi);

    router.layer(Extension(service))
}
