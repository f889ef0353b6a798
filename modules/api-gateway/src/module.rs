use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::middleware::from_fn_with_state;
use cc_http::config::ApiGatewayConfig;
use cc_http::middleware::{AuthState, authenticate};
use cc_http::rate_limit::TenantRateLimiters;
use cc_modkit::{Module, ModuleCtx, RestApiCapability};
use jsonwebtoken::DecodingKey;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::OpenApi;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The gateway's own slice of the configuration document. `jwt_secret`
/// signs and verifies the bearer tokens `cc_http::middleware::authenticate`
/// decodes; it lives here rather than in `cc-http` because every other
/// piece of gateway configuration is infrastructure wiring, while this
/// is the one secret, matching `credential-vault`'s master key living
/// in its own module config rather than a shared library.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GatewayModuleConfig {
    #[serde(default)]
    gateway: ApiGatewayConfig,
    jwt_secret: SecretString,
}

struct Runtime {
    config: ApiGatewayConfig,
    auth_state: AuthState,
}

/// Owns no domain state of its own: its job is wrapping the router
/// every other module has already mounted routes onto with the shared
/// middleware stack, plus exposing `/healthz` and the accumulated
/// OpenAPI document. The composition root must call
/// [`ApiGatewayModule::register_rest`] last, after every other
/// module's `RestApiCapability`, so the OpenAPI snapshot it captures
/// is complete.
#[derive(Default)]
pub struct ApiGatewayModule {
    runtime: ArcSwapOption<Runtime>,
}

impl ApiGatewayModule {
    /// Wraps `router` with, from outermost to innermost: request id
    /// (set, then propagated to the response), tracing, a request
    /// timeout, CORS, the body size limit, then authentication and
    /// per-tenant rate limiting. Auth sits innermost so every earlier
    /// layer still runs even for a request that is ultimately
    /// rejected as unauthenticated.
    ///
    /// # Panics
    ///
    /// Panics if called before `init()`.
    #[must_use]
    pub fn apply_middleware_stack(&self, router: Router) -> Router {
        let runtime = self.runtime.load_full().expect("api-gateway module not initialized");

        let router = router
            .layer(from_fn_with_state(runtime.auth_state.clone(), authenticate))
            .layer(DefaultBodyLimit::max(runtime.config.defaults.body_limit_bytes))
            .layer(cors_layer(&runtime.config))
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        router
    }
}

fn cors_layer(config: &ApiGatewayConfig) -> CorsLayer {
    let origins = if config.cors.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = config.cors.allowed_origins.iter().filter_map(|o| o.parse().ok()).collect::<Vec<_>>();
        AllowOrigin::list(values)
    };
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.cors.max_age_seconds))
}

#[async_trait]
impl Module for ApiGatewayModule {
    fn name(&self) -> &'static str {
        "api-gateway"
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        ctx.client_hub().get::<dyn tenancy::TenancyClient>()?;

        let config: GatewayModuleConfig = ctx.config()?;
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());
        let rate_limiters = TenantRateLimiters::new(config.gateway.defaults.rate_limit.clone());
        let auth_state = AuthState::new(decoding_key, rate_limiters, config.gateway.auth_disabled);

        self.runtime.store(Some(Arc::new(Runtime { config: config.gateway, auth_state })));
        Ok(())
    }
}

impl RestApiCapability for ApiGatewayModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router> {
        let runtime = self.runtime.load_full().ok_or_else(|| anyhow::anyhow!("api-gateway module not initialized"))?;
        if !runtime.config.enable_docs {
            return Ok(crate::api::rest::register(router, None));
        }
        Ok(crate::api::rest::register(router, Some(openapi.clone())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn config_requires_a_jwt_secret() {
        let err = serde_json::from_value::<GatewayModuleConfig>(serde_json::json!({})).unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));
    }

    #[test]
    fn config_defaults_the_gateway_section() {
        let config: GatewayModuleConfig = serde_json::from_value(serde_json::json!({
            "jwt_secret": "test-secret",
        }))
        .unwrap();
        assert_eq!(config.gateway.bind_addr, "0.0.0.0:8080");
        assert!(config.gateway.enable_docs);
    }

    #[test]
    fn config_rejects_unknown_top_level_keys() {
        let err = serde_json::from_value::<GatewayModuleConfig>(serde_json::json!({
            "jwt_secret": "test-secret",
            "unknown": true,
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn wildcard_cors_origin_is_accepted() {
        let config = ApiGatewayConfig { cors: cc_http::config::CorsConfig { allowed_origins: vec!["*".to_owned()], max_age_seconds: 60 }, ..Default::default() };
        let _layer = cors_layer(&config);
    }
}
