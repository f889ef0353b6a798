use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use axum::{Router, extract::Query};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{AccessScope, Principal};
use serde::Deserialize;
use utoipa::openapi::OpenApi;

use crate::domain::{DomainError, GitConfigRequest, Service};

fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

fn principal_scope(principal: &Principal) -> AccessScope {
    let environment = match principal {
        cc_security::Principal::Subject(ctx) => ctx.environment,
        cc_security::Principal::SystemAdmin { .. } => cc_security::Environment::Production,
    };
    AccessScope::for_tenant(principal.tenant_id(), environment)
}

async fn get_config(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>) -> impl IntoResponse {
    let scope = principal_scope(&principal);
    match service.get_config(&scope).await {
        Ok(config) => Json(config).into_response(),
        Err(err) => to_problem(&err, "/settings/git-config").into_response(),
    }
}

async fn put_config(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>, Json(body): Json<GitConfigRequest>) -> impl IntoResponse {
    let scope = principal_scope(&principal);
    match service.put_config(&scope, body).await {
        Ok(config) => Json(config).into_response(),
        Err(err) => to_problem(&err, "/settings/git-config").into_response(),
    }
}

async fn test_config(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>) -> impl IntoResponse {
    let scope = principal_scope(&principal);
    match service.test_config(&scope).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => to_problem(&err, "/settings/git-config:test").into_response(),
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
struct HistoryQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_limit() -> u64 {
    50
}

async fn get_sync_history(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>, Query(query): Query<HistoryQuery>) -> impl IntoResponse {
    let scope = principal_scope(&principal);
    match service.sync_history(&scope, query.skip, query.limit).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => to_problem(&err, "/settings/git-config/history").into_response(),
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::get("/settings/git-config")
        .operation_id("get_git_config")
        .summary("Fetch the tenant's Git synchronizer configuration, with the credential masked")
        .tag("git-sync")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .handler(get_config)
        .register(router, openapi);

    let router = OperationBuilder::patch("/settings/git-config")
        .operation_id("update_git_config")
        .summary("Configure the tenant's Git remote, branch, and conflict policy")
        .tag("git-sync")
        .authenticated()
        .error(StatusCode::UNPROCESSABLE_ENTITY)
        .handler(put_config)
        .register(router, openapi);

    let router = OperationBuilder::post("/settings/git-config:test")
        .operation_id("test_git_config")
        .summary("Attempt a dry-run connection to the configured remote without pushing or pulling")
        .tag("git-sync")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .error(StatusCode::BAD_GATEWAY)
        .handler(test_config)
        .register(router, openapi);

    let router = OperationBuilder::get("/settings/git-config/history")
        .operation_id("list_git_sync_history")
        .summary("List per-file push/pull outcomes for the tenant's Git synchronizer")
        .tag("git-sync")
        .authenticated()
        .handler(get_sync_history)
        .register(router, openapi);

    router.layer(Extension(service))
}
