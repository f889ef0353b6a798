use cc_security::{AccessScope, ScopeError};
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, IntoActiveModel};

use super::ScopableEntity;

/// Inserts a row after checking that its tenant column matches the
/// scope it is being inserted under. Mirrors the teacher's
/// `secure_insert`: the tenant id a caller supplies in the model body
/// is never trusted on its own, it must agree with the request scope.
///
/// # Errors
///
/// Returns [`ScopeError::Denied`] if the scope has no tenant, or
/// [`ScopeError::TenantMismatch`] if the model's tenant id disagrees
/// with the scope's. Returns the entity's insert error otherwise.
pub async fn secure_insert<E, C>(
    conn: &C,
    model: E::ActiveModel,
    scope: &AccessScope,
) -> Result<E::Model, WriteError>
where
    E: ScopableEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    let scope_tenant = scope.tenant_id().ok_or(ScopeError::Denied)?;
    let model_tenant = model.get(E::tenant_column());
    if let ActiveValue::Set(value) = &model_tenant {
        let matches = sea_orm::Value::from(scope_tenant) == *value;
        if !matches {
            return Err(WriteError::Scope(ScopeError::TenantMismatch));
        }
    }
    Ok(model.insert(conn).await?)
}

/// Tenant id is immutable once a row exists: `update` never touches the
/// tenant column, regardless of what the caller's active model sets.
///
/// # Errors
///
/// Returns the underlying `sea-orm` error if the update fails.
pub async fn secure_update<E, C>(conn: &C, mut model: E::ActiveModel) -> Result<E::Model, WriteError>
where
    E: ScopableEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    let _ = model.take(E::tenant_column());
    Ok(model.update(conn).await?)
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}
