use cc_db::DbConn;
use cc_db::secure::apply_scope;
use cc_security::AccessScope;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::{CachedAttribute, DomainError, PipConnection};
use crate::infra::entity::{cache, connection};

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn upsert_connection(&self, conn: PipConnection) -> Result<PipConnection, DomainError> {
        let model = connection::ActiveModel::from(&conn);
        connection::Entity::insert(model)
            .on_conflict(
                OnConflict::column(connection::Column::Id)
                    .update_columns([
                        connection::Column::Endpoint,
                        connection::Column::CredentialVaultId,
                        connection::Column::AttributeMapping,
                        connection::Column::SyncFrequencySeconds,
                        connection::Column::LastSyncedAt,
                        connection::Column::Status,
                    ])
                    .to_owned(),
            )
            .exec(self.db.inner())
            .await?;
        Ok(conn)
    }

    pub async fn get_connection(&self, scope: &AccessScope, id: Uuid) -> Result<PipConnection, DomainError> {
        let model = apply_scope(connection::Entity::find_by_id(id), scope).one(self.db.inner()).await?;
        model.ok_or(DomainError::ConnectionNotFound { id })?.try_into()
    }

    pub async fn list_connections(&self, scope: &AccessScope) -> Result<Vec<PipConnection>, DomainError> {
        let models = apply_scope(connection::Entity::find(), scope).all(self.db.inner()).await?;
        models.into_iter().map(TryInto::try_into).collect()
    }

    pub async fn mark_synced(&self, connection_id: Uuid) -> Result<(), DomainError> {
        let model = connection::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(connection_id),
            last_synced_at: sea_orm::ActiveValue::Set(Some(chrono::Utc::now())),
            ..Default::default()
        };
        connection::Entity::update(model).exec(self.db.inner()).await?;
        Ok(())
    }

    pub async fn get_cached(&self, connection_id: Uuid, attribute_path: &str) -> Result<Option<CachedAttribute>, DomainError> {
        let model = cache::Entity::find_by_id((connection_id, attribute_path.to_owned())).one(self.db.inner()).await?;
        Ok(model.map(CachedAttribute::from))
    }

    pub async fn list_cached_keys(&self, connection_id: Uuid) -> Result<Vec<String>, DomainError> {
        let models = cache::Entity::find().filter(cache::Column::ConnectionId.eq(connection_id)).all(self.db.inner()).await?;
        Ok(models.into_iter().map(|m| m.attribute_path).collect())
    }

    pub async fn upsert_cache(&self, connection_id: Uuid, attribute_path: &str, value: serde_json::Value, ttl_seconds: i64) -> Result<(), DomainError> {
        let model = cache::ActiveModel {
            connection_id: sea_orm::ActiveValue::Set(connection_id),
            attribute_path: sea_orm::ActiveValue::Set(attribute_path.to_owned()),
            value: sea_orm::ActiveValue::Set(value),
            fetched_at: sea_orm::ActiveValue::Set(chrono::Utc::now()),
            ttl_seconds: sea_orm::ActiveValue::Set(ttl_seconds),
        };
        cache::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([cache::Column::ConnectionId, cache::Column::AttributePath])
                    .update_columns([cache::Column::Value, cache::Column::FetchedAt, cache::Column::TtlSeconds])
                    .to_owned(),
            )
            .exec(self.db.inner())
            .await?;
        Ok(())
    }

    pub async fn delete_cache_for_connection(&self, connection_id: Uuid) -> Result<(), DomainError> {
        cache::Entity::delete_many().filter(cache::Column::ConnectionId.eq(connection_id)).exec(self.db.inner()).await?;
        Ok(())
    }
}
