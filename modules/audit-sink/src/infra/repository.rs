use cc_db::DbConn;
use cc_db::secure::apply_scope;
use cc_security::AccessScope;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, TransactionTrait};

use crate::domain::AuditEntry;
use crate::infra::entity::{self, Entity as AuditEntity};

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Inserts a stamped batch in one transaction. Either the whole
    /// batch lands or none of it does, so a caller's sequence number
    /// is never acked without the row actually existing.
    pub async fn insert_batch(&self, entries: &[AuditEntry]) -> Result<(), sea_orm::DbErr> {
        if entries.is_empty() {
            return Ok(());
        }
        let txn = self.db.inner().begin().await?;
        let models: Vec<entity::ActiveModel> = entries.iter().map(entity::ActiveModel::from).collect();
        AuditEntity::insert_many(models).exec(&txn).await?;
        txn.commit().await
    }

    pub async fn list(
        &self,
        scope: &AccessScope,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<AuditEntry>, sea_orm::DbErr> {
        let models = apply_scope(AuditEntity::find(), scope)
            .order_by_desc(entity::Column::RecordedAt)
            .paginate(self.db.inner(), limit.max(1))
            .fetch_page(skip / limit.max(1))
            .await?;
        Ok(models.into_iter().map(AuditEntry::from).collect())
    }
}
