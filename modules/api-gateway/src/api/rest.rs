use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Json, Router, http::StatusCode, response::IntoResponse};
use utoipa::openapi::OpenApi;

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

async fn get_openapi(Extension(doc): Extension<Arc<OpenApi>>) -> impl IntoResponse {
    Json((*doc).clone())
}

/// Mounts `/healthz` unconditionally, and `/openapi.json` only when the
/// caller supplies the accumulated document (the gateway's config can
/// disable docs entirely, e.g. in production). `doc` is the snapshot
/// taken after every other module has registered its routes, so the
/// composition root must call this last.
pub fn register(router: Router, doc: Option<OpenApi>) -> Router {
    let router = router.route("/healthz", get(healthz));
    match doc {
        Some(doc) => router.route("/openapi.json", get(get_openapi)).layer(Extension(Arc::new(doc))),
        None => router,
    }
}
