use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use cc_errors::{ErrorKind, Problem};
use cc_security::{Environment, Principal, SecurityContext};
use jsonwebtoken::{DecodingKey, Validation};
use secrecy::SecretString;
use serde::Deserialize;
use uuid::Uuid;

use crate::rate_limit::TenantRateLimiters;

/// The JWT claims every bearer token the gateway accepts must carry.
/// `env` selects which isolation tier the token is valid in; a token
/// minted for `sandbox` is never accepted on a `production` route.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: Uuid,
    tenant_id: Uuid,
    env: Environment,
    #[serde(default)]
    scopes: Vec<String>,
    #[serde(default)]
    subject_type: Option<String>,
}

#[derive(Clone)]
pub struct AuthState {
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    rate_limiters: Arc<TenantRateLimiters>,
    disabled: bool,
}

impl AuthState {
    #[must_use]
    pub fn new(decoding_key: DecodingKey, rate_limiters: TenantRateLimiters, disabled: bool) -> Self {
        Self {
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(Validation::default()),
            rate_limiters: Arc::new(rate_limiters),
            disabled,
        }
    }
}

/// Resolves the bearer token into a [`SecurityContext`], rejects
/// requests over a tenant's rate limit, and inserts the resulting
/// [`Principal`] into request extensions for handlers to read. This is
/// the innermost layer of the gateway's middleware stack: it runs
/// after CORS, body-limit and request-id, and before routing.
pub async fn authenticate(State(state): State<AuthState>, mut req: Request<Body>, next: Next) -> Response {
    if state.disabled {
        req.extensions_mut().insert(Principal::Subject(SecurityContext::anonymous(Environment::Sandbox)));
        return next.run(req).await;
    }

    let token = match bearer_token(&req) {
        Some(token) => token,
        None => return unauthenticated("missing bearer token"),
    };

    let claims = match jsonwebtoken::decode::<Claims>(&token, &state.decoding_key, &state.validation) {
        Ok(data) => data.claims,
        Err(_) => return unauthenticated("invalid or expired bearer token"),
    };

    if !state.rate_limiters.check(claims.tenant_id) {
        return too_many_requests();
    }

    let mut builder = SecurityContext::builder(claims.sub, claims.tenant_id, claims.env)
        .token_scopes(claims.scopes)
        .bearer_token(SecretString::from(token));
    if let Some(subject_type) = claims.subject_type {
        builder = builder.subject_type(subject_type);
    }
    req.extensions_mut().insert(Principal::Subject(builder.build()));
    next.run(req).await
}

fn bearer_token(req: &Request<Body>) -> Option<String> {
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(str::to_owned)
}

fn unauthenticated(detail: &str) -> Response {
    Problem::new(ErrorKind::Unauthenticated, detail, "").into_response()
}

fn too_many_requests() -> Response {
    (StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_strips_prefix() {
        let mut req = Request::builder().body(Body::empty()).expect("valid request");
        req.headers_mut().insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().expect("valid header value"));
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_yields_none() {
        let req = Request::builder().body(Body::empty()).expect("valid request");
        assert!(bearer_token(&req).is_none());
    }
}
