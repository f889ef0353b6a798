use cc_db::DbConn;
use cc_db::secure::apply_scope;
use cc_security::AccessScope;
use sea_orm::{EntityTrait, TransactionTrait};
use uuid::Uuid;

use crate::domain::{DomainError, Policy, PromotionStatus};
use crate::infra::entity::policy;

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn insert(&self, policy: Policy) -> Result<Policy, DomainError> {
        policy::Entity::insert(policy::ActiveModel::from(&policy)).exec(self.db.inner()).await?;
        Ok(policy)
    }

    pub async fn get(&self, scope: &AccessScope, id: Uuid) -> Result<Policy, DomainError> {
        let model = apply_scope(policy::Entity::find_by_id(id), scope).one(self.db.inner()).await?;
        model.ok_or(DomainError::NotFound { id })?.try_into()
    }

    pub async fn list(&self, scope: &AccessScope) -> Result<Vec<Policy>, DomainError> {
        let models = apply_scope(policy::Entity::find(), scope).all(self.db.inner()).await?;
        models.into_iter().map(TryInto::try_into).collect()
    }

    pub async fn update(&self, policy: Policy) -> Result<Policy, DomainError> {
        policy::Entity::update(policy::ActiveModel::from(&policy)).exec(self.db.inner()).await?;
        Ok(policy)
    }

    /// One transaction: the sandbox row's status flips to `pending`
    /// promotion bookkeeping and the new production row is inserted,
    /// so a crash mid-promotion never leaves a production row without
    /// its sandbox ancestor having been marked.
    pub async fn promote(&self, sandbox_id: Uuid, production: Policy) -> Result<Policy, DomainError> {
        let txn = self.db.inner().begin().await?;

        let mut sandbox_model: policy::ActiveModel = policy::Entity::find_by_id(sandbox_id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotInSandbox { id: sandbox_id })?
            .into();
        sandbox_model.sandbox_status = sea_orm::ActiveValue::Set(PromotionStatus::Pending.as_str().to_owned());
        policy::Entity::update(sandbox_model).exec(&txn).await?;

        policy::Entity::insert(policy::ActiveModel::from(&production)).exec(&txn).await?;

        txn.commit().await?;
        Ok(production)
    }
}
