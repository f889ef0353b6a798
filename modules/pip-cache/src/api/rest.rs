use std::sync::Arc;

use axum::{Extension, Json, Router, extract::Path, http::StatusCode, response::IntoResponse};
use cc_errors::Problem;
use cc_http::OperationBuilder;
use cc_security::{AccessScope, Principal};
use serde::{Deserialize, Serialize};
use utoipa::openapi::OpenApi;
use uuid::Uuid;

use crate::domain::{ConnectionKind, DomainError, PipConnection, Service};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterConnectionRequest {
    pub kind: ConnectionKind,
    pub endpoint: String,
    pub credential_vault_id: Uuid,
    #[serde(default)]
    pub attribute_mapping: serde_json::Value,
    pub sync_frequency_seconds: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ConnectionResponse {
    pub id: Uuid,
    pub kind: ConnectionKind,
    pub endpoint: String,
    pub sync_frequency_seconds: i64,
    pub last_synced_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<PipConnection> for ConnectionResponse {
    fn from(c: PipConnection) -> Self {
        Self { id: c.id, kind: c.kind, endpoint: c.endpoint, sync_frequency_seconds: c.sync_frequency_seconds, last_synced_at: c.last_synced_at }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct WebhookPayload {
    pub connection_id: Uuid,
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

async fn register_connection(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<RegisterConnectionRequest>,
) -> impl IntoResponse {
    let connection = PipConnection {
        id: Uuid::new_v4(),
        tenant_id: principal.tenant_id(),
        environment: principal_environment(&principal),
        kind: body.kind,
        endpoint: body.endpoint,
        credential_vault_id: body.credential_vault_id,
        attribute_mapping: body.attribute_mapping,
        sync_frequency_seconds: body.sync_frequency_seconds,
        last_synced_at: None,
        status: crate::domain::ConnectionStatus::Active,
        created_at: chrono::Utc::now(),
    };
    match service.register_connection(connection).await {
        Ok(connection) => Json(ConnectionResponse::from(connection)).into_response(),
        Err(err) => to_problem(&err, "/pip/connections").into_response(),
    }
}

async fn get_connection(
    Extension(service): Extension<Arc<Service>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.get_connection(&scope, id).await {
        Ok(connection) => Json(ConnectionResponse::from(connection)).into_response(),
        Err(err) => to_problem(&err, &format!("/pip/connections/{id}")).into_response(),
    }
}

async fn list_connections(Extension(service): Extension<Arc<Service>>, Extension(principal): Extension<Principal>) -> impl IntoResponse {
    let scope = AccessScope::for_tenant(principal.tenant_id(), principal_environment(&principal));
    match service.list_connections(&scope).await {
        Ok(connections) => Json(connections.into_iter().map(ConnectionResponse::from).collect::<Vec<_>>()).into_response(),
        Err(err) => to_problem(&err, "/pip/connections").into_response(),
    }
}

async fn receive_webhook(
    Extension(service): Extension<Arc<Service>>,
    Path(_connection_kind): Path<String>,
    Json(body): Json<WebhookPayload>,
) -> impl IntoResponse {
    match service.invalidate(body.connection_id).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(err) => to_problem(&err, "/pip/webhooks").into_response(),
    }
}

pub fn register(router: Router, openapi: &mut OpenApi, service: Arc<Service>) -> Router {
    let router = OperationBuilder::post("/pip/connections")
        .operation_id("register_pip_connection")
        .summary("Register a PIP connection")
        .tag("pip")
        .authenticated()
        .error(StatusCode::UNPROCESSABLE_ENTITY)
        .handler(register_connection)
        .register(router, openapi);

    let router = OperationBuilder::get("/pip/connections/{id}")
        .operation_id("get_pip_connection")
        .summary("Fetch a PIP connection by id")
        .tag("pip")
        .authenticated()
        .error(StatusCode::NOT_FOUND)
        .handler(get_connection)
        .register(router, openapi);

    let router = OperationBuilder::get("/pip/connections")
        .operation_id("list_pip_connections")
        .summary("List PIP connections for the caller's tenant")
        .tag("pip")
        .authenticated()
        .handler(list_connections)
        .register(router, openapi);

    let router = OperationBuilder::post("/pip/webhooks/{connection_kind}")
        .operation_id("receive_pip_webhook")
        .summary("Invalidate a PIP connection's cache on upstream change notification")
        .tag("pip")
        .handler(receive_webhook)
        .register(router, openapi);

    router.layer(Extension(service))
}
