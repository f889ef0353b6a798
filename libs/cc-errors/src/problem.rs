use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::kind::ErrorKind;

/// An RFC 9457 `application/problem+json` body. Every error response
/// the gateway sends has this shape; there is no other error format in
/// the public API.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Problem {
    #[must_use]
    pub fn new(kind: ErrorKind, detail: impl Into<String>, instance: impl Into<String>) -> Self {
        let status = kind.status_code();
        Self {
            type_uri: format!("https://control-core.dev/errors/{}", kind.slug()),
            title: kind.slug().replace('_', " "),
            status: status.as_u16(),
            detail: detail.into(),
            instance: instance.into(),
            trace_id: current_trace_id(),
        }
    }
}

fn current_trace_id() -> Option<String> {
    tracing::Span::current()
        .id()
        .map(|id| format!("{:x}", id.into_u64()))
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn problem_carries_the_right_status() {
        let problem = Problem::new(ErrorKind::NotFound, "policy not found", "/policies/123");
        assert_eq!(problem.status, 404);
        assert_eq!(problem.type_uri, "https://control-core.dev/errors/not_found");
    }

    #[test]
    fn serializes_without_trace_id_when_absent() {
        let problem = Problem::new(ErrorKind::Validation, "bad input", "/policies");
        let json = serde_json::to_string(&problem).unwrap();
        assert!(!json.contains("trace_id"));
    }
}
