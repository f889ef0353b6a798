use std::sync::Arc;

use axum::{Extension, Json, Router, extract::Path, extract::Query, http::StatusCode, response::IntoResponse};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{AccessScope, Principal};
use serde::Deserialize;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{DeploymentMode, DomainError, GlobalPepConfig, IndividualPepConfig, Service};

fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

fn principal_environment(principal: &Principal) -> cc_security::Environment {
    match principal {
        Principal::Subject(ctx) => ctx.environment,
        Principal::SystemAdmin { .. } => cc_security::Environment::Production,
    }
}

async fn get_global_config(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.get_or_create_global(&scope).await {
        Ok(config) => Json(config).into_response(),
        Err(err) => to_problem(&err, "/pep-config/global").into_response(),
    }
}

async fn put_global_config(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<GlobalPepConfig>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.update_global(&scope, body).await {
        Ok(config) => Json(config).into_response(),
        Err(err) => to_problem(&err, "/pep-config/global").into_response(),
    }
}

async fn get_individual_config(Extension(service): Extension<Arc<Service>>, Path(pep_id): Path<Uuid>) -> impl IntoResponse {
    match service.get_individual(pep_id).await {
        Ok(Some(config)) => Json(config).into_response(),
        Ok(None) => to_problem(&DomainError::IndividualNotFound { pep_id }, &format!("/pep-config/individual/{pep_id}")).into_response(),
        Err(err) => to_problem(&err, &format!("/pep-config/individual/{pep_id}")).into_response(),
    }
}

async fn put_individual_config(
    Extension(service): Extension<Arc<Service>>,
    Path(pep_id): Path<Uuid>,
    Json(mut body): Json<IndividualPepConfig>,
) -> impl IntoResponse {
    body.pep_id = pep_id;
    match service.update_individual(body).await {
        Ok(config) => Json(config).into_response(),
        Err(err) => to_problem(&err, &format!("/pep-config/individual/{pep_id}")).into_response(),
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
struct EffectiveConfigQuery {
    mode: DeploymentMode,
}

async fn get_effective_config(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(pep_id): Path<Uuid>,
    Query(query): Query<EffectiveConfigQuery>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.effective_config(&scope, pep_id, query.mode).await {
        Ok(config) => Json(config).into_response(),
        Err(err) => to_problem(&err, &format!("/pep-config/effective/{pep_id}")).into_response(),
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::get("/pep-config/global")
        .operation_id("get_global_pep_config")
        .summary("Fetch the tenant/environment global PEP configuration, seeding defaults on first access")
        .tag("pep-config")
        .authenticated()
        .handler(get_global_config)
        .register(router, openapi);

    let router = OperationBuilder::patch("/pep-config/global")
        .operation_id("update_global_pep_config")
        .summary("Update the tenant/environment global PEP configuration")
        .tag("pep-config")
        .authenticated()
        .error(StatusCode::UNPROCESSABLE_ENTITY)
        .handler(put_global_config)
        .register(router, openapi);

    let router = OperationBuilder::get("/pep-config/individual/{pep_id}")
        .operation_id("get_individual_pep_config")
        .summary("Fetch a PEP's individual configuration overrides")
        .tag("pep-config")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .handler(get_individual_config)
        .register(router, openapi);

    let router = OperationBuilder::patch("/pep-config/individual/{pep_id}")
        .operation_id("update_individual_pep_config")
        .summary("Update a PEP's individual configuration overrides")
        .tag("pep-config")
        .authenticated()
        .error(StatusCode::UNPROCESSABLE_ENTITY)
        .handler(put_individual_config)
        .register(router, openapi);

    let router = OperationBuilder::get("/pep-config/effective/{pep_id}")
        .operation_id("get_effective_pep_config")
        .summary("Resolve a PEP's effective configuration by merging global defaults with its overrides")
        .tag("pep-config")
        .authenticated()
        .handler(get_effective_config)
        .register(router, openapi);

    router.layer(Extension(service))
}
