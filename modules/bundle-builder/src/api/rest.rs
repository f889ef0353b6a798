use std::sync::Arc;

use axum::{Extension, Json, Router, extract::Path, extract::Query, response::IntoResponse};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{AccessScope, Environment, Principal};
use serde::Deserialize;
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{DomainError, Service};

fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
struct BundleQuery {
    environment: Environment,
}

async fn get_bundle(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(pep_id): Path<Uuid>,
    Query(query): Query<BundleQuery>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), query.environment);
    match service.get_or_build(&scope, pep_id, query.environment).await {
        Ok(bundle) => Json(bundle).into_response(),
        Err(err) => to_problem(&err, &format!("/bundles/{pep_id}")).into_response(),
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::get("/bundles/{pep_id}")
        .operation_id("get_pep_bundle")
        .summary("Fetch the newest successfully built bundle for a PEP, building one on demand if none is cached yet")
        .tag("bundle-builder")
        .authenticated()
        .handler(get_bundle)
        .register(router, openapi);

    router.layer(Extension(service))
}
