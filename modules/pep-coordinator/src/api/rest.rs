use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::{Extension, Json, Router, http::StatusCode, response::IntoResponse};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{AccessScope, Principal};
use serde::Deserialize;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{BundleFetchOutcome, DomainError, FetchBundleQuery, HeartbeatRequest, RegisterRequest, Service};

fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

fn principal_scope(principal: &Principal) -> AccessScope {
    let environment = match principal {
        Principal::Subject(ctx) => ctx.environment,
        Principal::SystemAdmin { .. } => cc_security::Environment::Production,
    };
    AccessScope::for_tenant(principal.tenant_id(), environment)
}

async fn register_pep(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>, Json(body): Json<RegisterRequest>) -> impl IntoResponse {
    match service.register(principal.tenant_id(), body).await {
        Ok(registration) => (StatusCode::CREATED, Json(registration)).into_response(),
        Err(err) => to_problem(&err, "/peps/register").into_response(),
    }
}

async fn get_pep(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>, Path(pep_id): Path<Uuid>) -> impl IntoResponse {
    let scope = principal_scope(&principal);
    match service.get(&scope, pep_id).await {
        Ok(pep) => Json(pep).into_response(),
        Err(err) => to_problem(&err, "/peps/{id}").into_response(),
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
struct ListQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_limit() -> u64 {
    50
}

async fn list_peps(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>, Query(query): Query<ListQuery>) -> impl IntoResponse {
    let scope = principal_scope(&principal);
    match service.list(&scope, query.skip, query.limit).await {
        Ok(peps) => Json(peps).into_response(),
        Err(err) => to_problem(&err, "/peps").into_response(),
    }
}

/// Unauthenticated at the gateway layer: the PEP carries its
/// registration token in the body instead of a tenant bearer token,
/// the same split `pip-cache`'s provider webhook uses for a caller
/// that is not a logged-in subject.
async fn heartbeat(Extension(service): Extension<Arc<Service>>, Path(pep_id): Path<Uuid>, Json(body): Json<HeartbeatRequest>) -> impl IntoResponse {
    match service.heartbeat(pep_id, &body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => to_problem(&err, "/peps/{id}/heartbeat").into_response(),
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
struct TokenQuery {
    registration_token: String,
}

async fn poll_effective_config(Extension(service): Extension<Arc<Service>>, Path(pep_id): Path<Uuid>, Query(query): Query<TokenQuery>) -> impl IntoResponse {
    match service.poll_effective_config(pep_id, &query.registration_token).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => to_problem(&err, "/pep-config/effective/{pep_id}").into_response(),
    }
}

async fn fetch_bundle(Extension(service): Extension<Arc<Service>>, Path(pep_id): Path<Uuid>, Query(query): Query<FetchBundleQuery>) -> impl IntoResponse {
    match service.fetch_bundle(pep_id, &query).await {
        Ok(BundleFetchOutcome::NotModified) => StatusCode::NOT_MODIFIED.into_response(),
        Ok(BundleFetchOutcome::Bundle(bundle)) => Json(bundle).into_response(),
        Err(err) => to_problem(&err, "/pep-config/effective/{pep_id}/bundle").into_response(),
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::post("/peps/register")
        .operation_id("register_pep")
        .summary("Register a PEP, idempotent on tenant/environment/external id")
        .tag("pep-coordinator")
        .authenticated()
        .error(StatusCode::UNPROCESSABLE_ENTITY)
        .handler(register_pep)
        .register(router, openapi);

    let router = OperationBuilder::get("/peps/{id}")
        .operation_id("get_pep")
        .summary("Fetch a registered PEP by id")
        .tag("pep-coordinator")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .handler(get_pep)
        .register(router, openapi);

    let router = OperationBuilder::get("/peps")
        .operation_id("list_peps")
        .summary("List PEPs registered for the caller's tenant and environment")
        .tag("pep-coordinator")
        .authenticated()
        .handler(list_peps)
        .register(router, openapi);

    let router = OperationBuilder::post("/peps/{id}/heartbeat")
        .operation_id("pep_heartbeat")
        .summary("Report liveness and an optional self-report for a registered PEP")
        .tag("pep-coordinator")
        .error(StatusCode::NOT_FOUND)
        .error(StatusCode::UNAUTHORIZED)
        .handler(heartbeat)
        .register(router, openapi);

    let router = OperationBuilder::get("/pep-config/effective/{pep_id}")
        .operation_id("poll_effective_config")
        .summary("Poll the merged configuration and current bundle version for a PEP")
        .tag("pep-coordinator")
        .error(StatusCode::NOT_FOUND)
        .error(StatusCode::UNAUTHORIZED)
        .error(StatusCode::BAD_GATEWAY)
        .handler(poll_effective_config)
        .register(router, openapi);

    let router = OperationBuilder::get("/pep-config/effective/{pep_id}/bundle")
        .operation_id("fetch_pep_bundle")
        .summary("Fetch the content-addressed policy bundle for a PEP, or a not-modified signal")
        .tag("pep-coordinator")
        .error(StatusCode::NOT_FOUND)
        .error(StatusCode::UNAUTHORIZED)
        .error(StatusCode::BAD_GATEWAY)
        .handler(fetch_bundle)
        .register(router, openapi);

    router.layer(Extension(service))
}
