use std::sync::Arc;

use axum::{Extension, Json, Router, http::StatusCode, response::IntoResponse};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{Environment, Principal};
use utoipa::openapi::OpenApi;

use crate::domain::{DecisionRequest, DomainError, Service};

fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

fn principal_environment(principal: &Principal) -> Environment {
    match principal {
        Principal::Subject(ctx) => ctx.environment,
        Principal::SystemAdmin { .. } => Environment::Production,
    }
}

async fn decide(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>, Json(body): Json<DecisionRequest>) -> impl IntoResponse {
    let environment = principal_environment(&principal);
    match service.decide(&principal, environment, body).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => to_problem(&err, "/decisions").into_response(),
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::post("/decisions")
        .operation_id("decide")
        .summary("Evaluate an access request against the caller's active policy bundle")
        .tag("decision-engine")
        .authenticated()
        .error(StatusCode::BAD_GATEWAY)
        .handler(decide)
        .register(router, openapi);

    router.layer(Extension(service))
}
