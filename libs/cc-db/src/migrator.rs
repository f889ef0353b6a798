use sea_orm_migration::{MigrationTrait, MigratorTrait};

use crate::DbConn;

#[derive(Debug, thiserror::Error)]
pub enum SchemaDriftError {
    #[error("pending migrations detected: {count} migration(s) not applied; refusing to start")]
    PendingMigrations { count: usize },
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// Applies every migration every module contributed, then fails fast
/// if anything is still pending. Control Core never serves traffic
/// against a schema it does not recognize: the composition root calls
/// this before binding the HTTP listener, and a [`SchemaDriftError`] is
/// treated as a fatal boot error, matching the spec's
/// `schema_drift_fatal` error kind.
///
/// # Errors
///
/// Returns [`SchemaDriftError::Db`] if a migration fails to apply, or
/// [`SchemaDriftError::PendingMigrations`] if migrations remain pending
/// after the apply step.
pub async fn run_and_verify<M: MigratorTrait>(db: &DbConn) -> Result<(), SchemaDriftError> {
    M::up(db.inner(), None).await?;
    let pending = M::get_pending_migrations(db.inner()).await?;
    if !pending.is_empty() {
        return Err(SchemaDriftError::PendingMigrations { count: pending.len() });
    }
    Ok(())
}

/// Collects every module's migrations into one ordered list. Each
/// module contributes its migrations from its `DatabaseCapability`
/// implementation; the composition root concatenates them in module
/// registration order before building the aggregate `Migrator`.
#[must_use]
pub fn collect(sources: Vec<Vec<Box<dyn MigrationTrait>>>) -> Vec<Box<dyn MigrationTrait>> {
    sources.into_iter().flatten().collect()
}
