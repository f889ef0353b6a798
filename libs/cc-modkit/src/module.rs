use async_trait::async_trait;
use axum::Router;
use sea_orm_migration::MigrationTrait;
use utoipa::openapi::OpenApi;

use crate::context::ModuleCtx;

/// Every module in the workspace implements this. `init` is called
/// once, in dependency order, by the composition root; it is where a
/// module reads its config, resolves the clients it depends on from
/// the [`ClientHub`](crate::ClientHub), and registers the client it
/// offers in return.
#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &'static str;

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()>;
}

/// Implemented by modules that own database tables. The composition
/// root concatenates every module's migrations, in registration order,
/// before running them and checking for drift.
pub trait DatabaseCapability: Module {
    fn migrations(&self) -> Vec<Box<dyn MigrationTrait>>;
}

/// Implemented by modules that expose an HTTP surface. `register_rest`
/// receives the shared router and OpenAPI document so routes compose
/// into one gateway rather than one Axum server per module.
pub trait RestApiCapability: Module {
    fn register_rest(&self, ctx: &ModuleCtx, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router>;
}
