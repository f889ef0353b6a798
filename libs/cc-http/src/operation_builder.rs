use axum::{
    Router,
    handler::Handler,
    http::StatusCode,
    routing::{MethodRouter, delete, get, patch, post},
};
use utoipa::openapi::{HttpMethod, OpenApi, path::OperationBuilder as UtoipaOperationBuilder};

/// A small, opinionated fluent wrapper over Axum route registration
/// plus OpenAPI bookkeeping. Every REST module in the workspace
/// registers its routes through this builder instead of calling
/// `Router::route` directly, so every operation carries an id, a
/// summary and a documented error surface.
pub struct OperationBuilder {
    path: &'static str,
    method: HttpMethod,
    operation_id: Option<&'static str>,
    summary: Option<&'static str>,
    tag: Option<&'static str>,
    authenticated: bool,
    errors: Vec<StatusCode>,
    method_router: Option<MethodRouter>,
}

impl OperationBuilder {
    #[must_use]
    pub fn get(path: &'static str) -> Self {
        Self::new(path, HttpMethod::Get)
    }

    #[must_use]
    pub fn post(path: &'static str) -> Self {
        Self::new(path, HttpMethod::Post)
    }

    #[must_use]
    pub fn patch(path: &'static str) -> Self {
        Self::new(path, HttpMethod::Patch)
    }

    #[must_use]
    pub fn delete(path: &'static str) -> Self {
        Self::new(path, HttpMethod::Delete)
    }

    fn new(path: &'static str, method: HttpMethod) -> Self {
        Self {
            path,
            method,
            operation_id: None,
            summary: None,
            tag: None,
            authenticated: false,
            errors: Vec::new(),
            method_router: None,
        }
    }

    #[must_use]
    pub fn operation_id(mut self, id: &'static str) -> Self {
        self.operation_id = Some(id);
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: &'static str) -> Self {
        self.summary = Some(summary);
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Marks the route as requiring a [`cc_security::Principal`] in
    /// request extensions. Purely documentation-facing here: the
    /// actual enforcement happens in `cc_http::middleware::authenticate`,
    /// this flag only controls whether `401`/`403` are documented on
    /// the generated OpenAPI operation.
    #[must_use]
    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    #[must_use]
    pub fn error(mut self, status: StatusCode) -> Self {
        self.errors.push(status);
        self
    }

    #[must_use]
    pub fn handler<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let method_router = match self.method {
            HttpMethod::Get => get(handler),
            HttpMethod::Post => post(handler),
            HttpMethod::Patch => patch(handler),
            HttpMethod::Delete => delete(handler),
            _ => get(handler),
        };
        self.method_router = Some(method_router);
        self
    }

    /// Wires the route into `router` and records it on `openapi`.
    ///
    /// # Panics
    ///
    /// Panics if `handler` was never called; every call site supplies
    /// a handler immediately before `register`, so this would only
    /// fire on a programming error in module wiring.
    pub fn register(self, router: Router, openapi: &mut OpenApi) -> Router {
        let method_router = self.method_router.expect("handler() must be called before register()");
        let router = router.route(self.path, method_router);

        let mut op = UtoipaOperationBuilder::new();
        if let Some(id) = self.operation_id {
            op = op.operation_id(Some(id));
        }
        if let Some(summary) = self.summary {
            op = op.summary(Some(summary));
        }
        if let Some(tag) = self.tag {
            op = op.tag(tag);
        }
        if self.authenticated {
            op = op
                .response("401", utoipa::openapi::ResponseBuilder::new().description("unauthenticated").build())
                .response("403", utoipa::openapi::ResponseBuilder::new().description("forbidden").build());
        }
        for status in &self.errors {
            op = op.response(
                status.as_str(),
                utoipa::openapi::ResponseBuilder::new().description(status.canonical_reason().unwrap_or("error")).build(),
            );
        }
        openapi.paths.add_path_operation(self.path, vec![self.method], op.build());
        router
    }
}
