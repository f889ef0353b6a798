//! Runs the aggregate migrator and refuses to let the process continue
//! if the applied schema still disagrees with what the workspace
//! expects. Not a `Module` itself: the composition root calls
//! [`install`] once, after every module's `DatabaseCapability` has
//! contributed its migrations, then [`run`] before any module's
//! `init()` executes — a schema mismatch must abort startup before any
//! module can touch the database.

use std::sync::OnceLock;

use cc_db::{DbConn, SchemaDriftError};
use sea_orm_migration::{MigrationTrait, MigratorTrait};

type Factory = Box<dyn Fn() -> Vec<Box<dyn MigrationTrait>> + Send + Sync>;

static MIGRATIONS: OnceLock<Factory> = OnceLock::new();

/// Registers the closure the composition root uses to rebuild the full
/// migration list on demand. `sea_orm_migration`'s `MigratorTrait`
/// calls `migrations()` more than once per run (once to apply, once to
/// check for drift), so this stores a factory rather than a one-shot
/// `Vec`.
///
/// # Panics
///
/// Panics if called more than once; the composition root calls this
/// exactly once, at startup, before `run`.
pub fn install(factory: impl Fn() -> Vec<Box<dyn MigrationTrait>> + Send + Sync + 'static) {
    MIGRATIONS.set(Box::new(factory)).unwrap_or_else(|_| panic!("schema-runner migrations already installed"));
}

pub struct AggregateMigrator;

impl MigratorTrait for AggregateMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        MIGRATIONS.get().map_or_else(Vec::new, |factory| factory())
    }
}

/// # Errors
///
/// Returns [`SchemaDriftError`] if a migration fails to apply or if
/// pending migrations remain after the apply step.
pub async fn run(db: &DbConn) -> Result<(), SchemaDriftError> {
    tracing::info!("running schema migrations");
    cc_db::run_and_verify::<AggregateMigrator>(db).await?;
    tracing::info!("schema is up to date");
    Ok(())
}
