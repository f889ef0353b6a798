use std::sync::Arc;

use axum::{Extension, Router, http::StatusCode};
use cc_http::OperationBuilder;
use utoipa::openapi::OpenApi;

use crate::domain::Service;

use super::handlers;

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::post("/tenants")
        .operation_id("create_tenant")
        .summary("Create a tenant")
        .tag("tenancy")
        .authenticated()
        .error(StatusCode::CONFLICT)
        .error(StatusCode::UNPROCESSABLE_ENTITY)
        .handler(handlers::create_tenant)
        .register(router, openapi);

    let router = OperationBuilder::get("/tenants/{id}")
        .operation_id("get_tenant")
        .summary("Fetch a tenant by id")
        .tag("tenancy")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .handler(handlers::get_tenant)
        .register(router, openapi);

    let router = OperationBuilder::get("/tenants")
        .operation_id("list_tenants")
        .summary("List tenants")
        .tag("tenancy")
        .authenticated()
        .handler(handlers::list_tenants)
        .register(router, openapi);

    router.layer(Extension(service))
}
