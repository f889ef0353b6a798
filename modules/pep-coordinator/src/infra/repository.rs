use cc_db::DbConn;
use cc_db::secure::apply_scope;
use cc_security::AccessScope;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::domain::{DomainError, Pep, PepHealth};
use crate::infra::entity::pep;

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn decode(model: pep::Model) -> Result<(Pep, String), DomainError> {
        <(Pep, String)>::try_from(model).map_err(|e| DomainError::Database(sea_orm::DbErr::Custom(e.to_string())))
    }

    pub async fn find_by_identity(&self, tenant_id: Uuid, environment: cc_security::Environment, external_id: &str) -> Result<Option<(Pep, String)>, DomainError> {
        let model = pep::Entity::find()
            .filter(pep::Column::TenantId.eq(tenant_id))
            .filter(pep::Column::Environment.eq(environment.as_str()))
            .filter(pep::Column::ExternalId.eq(external_id))
            .one(self.db.inner())
            .await?;
        model.map(Self::decode).transpose()
    }

    pub async fn get_for_auth(&self, pep_id: Uuid) -> Result<Option<(Pep, String)>, DomainError> {
        let model = pep::Entity::find_by_id(pep_id).one(self.db.inner()).await?;
        model.map(Self::decode).transpose()
    }

    pub async fn get_scoped(&self, scope: &AccessScope, pep_id: Uuid) -> Result<Option<Pep>, DomainError> {
        let model = apply_scope(pep::Entity::find(), scope).filter(pep::Column::Id.eq(pep_id)).one(self.db.inner()).await?;
        model.map(Self::decode).transpose().map(|opt| opt.map(|(pep, _)| pep))
    }

    pub async fn list(&self, scope: &AccessScope, skip: u64, limit: u64) -> Result<Vec<Pep>, DomainError> {
        let rows = apply_scope(pep::Entity::find(), scope)
            .order_by_desc(pep::Column::RegisteredAt)
            .paginate(self.db.inner(), limit.max(1))
            .fetch_page(skip / limit.max(1))
            .await?;
        rows.into_iter().map(|m| Self::decode(m).map(|(pep, _)| pep)).collect()
    }

    pub async fn upsert(&self, pep: &Pep, token_hash: &str) -> Result<(), DomainError> {
        let model = pep::to_active_model(pep, token_hash);
        pep::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(pep::Column::Id)
                    .update_columns([
                        pep::Column::Mode,
                        pep::Column::Metadata,
                        pep::Column::RegistrationTokenHash,
                        pep::Column::LastSeenAt,
                        pep::Column::Health,
                    ])
                    .to_owned(),
            )
            .exec(self.db.inner())
            .await?;
        Ok(())
    }

    pub async fn touch_heartbeat(&self, pep_id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(model) = pep::Entity::find_by_id(pep_id).one(self.db.inner()).await? {
            let mut active: pep::ActiveModel = model.into();
            active.last_seen_at = sea_orm::ActiveValue::Set(Some(at));
            active.health = sea_orm::ActiveValue::Set(PepHealth::Healthy.as_str().to_owned());
            pep::Entity::update(active).exec(self.db.inner()).await?;
        }
        Ok(())
    }

    /// Every PEP currently `healthy` whose last activity (heartbeat, or
    /// registration if it has never sent one) is older than `before`.
    pub async fn list_overdue(&self, before: DateTime<Utc>) -> Result<Vec<Uuid>, DomainError> {
        let rows = pep::Entity::find().filter(pep::Column::Health.eq(PepHealth::Healthy.as_str())).all(self.db.inner()).await?;
        Ok(rows
            .into_iter()
            .filter(|m| m.last_seen_at.unwrap_or(m.registered_at) < before)
            .map(|m| m.id)
            .collect())
    }

    pub async fn mark_unhealthy(&self, ids: &[Uuid]) -> Result<(), DomainError> {
        if ids.is_empty() {
            return Ok(());
        }
        pep::Entity::update_many()
            .col_expr(pep::Column::Health, sea_orm::sea_query::Expr::value(PepHealth::Unhealthy.as_str()))
            .filter(pep::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db.inner())
            .await?;
        Ok(())
    }
}
