use axum::{Extension, Json, extract::Path, response::IntoResponse};
use uuid::Uuid;

use crate::domain::Service;

use super::dto::{CreateTenantRequest, TenantResponse};
use super::error::to_problem;

pub async fn create_tenant(Extension(service): Extension<std::sync::Arc<Service>>, Json(body): Json<CreateTenantRequest>) -> impl IntoResponse {
    match service.create(body.name, body.slug).await {
        Ok(tenant) => Json(TenantResponse::from(tenant)).into_response(),
        Err(err) => to_problem(&err, "/tenants").into_response(),
    }
}

pub async fn get_tenant(Extension(service): Extension<std::sync::Arc<Service>>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match service.get(id).await {
        Ok(tenant) => Json(TenantResponse::from(tenant)).into_response(),
        Err(err) => to_problem(&err, &format!("/tenants/{id}")).into_response(),
    }
}

pub async fn list_tenants(Extension(service): Extension<std::sync::Arc<Service>>) -> impl IntoResponse {
    match service.list().await {
        Ok(tenants) => Json(tenants.into_iter().map(TenantResponse::from).collect::<Vec<_>>()).into_response(),
        Err(err) => to_problem(&err, "/tenants").into_response(),
    }
}
