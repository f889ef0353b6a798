use cc_db::DbConn;
use cc_db::secure::apply_scope;
use cc_security::AccessScope;
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::envelope::Ciphertext;
use crate::infra::entity::{self, Entity as VaultEntity};

#[derive(Clone)]
pub struct Repository {
    db: DbConn,
}

impl Repository {
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn store(&self, tenant_id: Uuid, label: &str, ciphertext: Ciphertext) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let model = entity::ActiveModel {
            id: ActiveValue::Set(id),
            tenant_id: ActiveValue::Set(tenant_id),
            label: ActiveValue::Set(label.to_owned()),
            nonce: ActiveValue::Set(ciphertext.nonce),
            ciphertext: ActiveValue::Set(ciphertext.bytes),
            created_at: ActiveValue::Set(chrono::Utc::now()),
        };
        model.insert(self.db.inner()).await?;
        Ok(id)
    }

    pub async fn load(&self, tenant_id: Uuid, id: Uuid) -> Result<Ciphertext, DomainError> {
        let scope = AccessScope::for_tenant(tenant_id, cc_security::Environment::Sandbox).for_resource(id);
        let model = apply_scope(VaultEntity::find_by_id(id), &scope).one(self.db.inner()).await?;
        let model = model.ok_or(DomainError::NotFound { id })?;
        Ok(Ciphertext { nonce: model.nonce, bytes: model.ciphertext })
    }

    pub async fn replace(&self, tenant_id: Uuid, id: Uuid, ciphertext: Ciphertext) -> Result<(), DomainError> {
        let model = VaultEntity::find_by_id(id).one(self.db.inner()).await?;
        let model = model.filter(|m| m.tenant_id == tenant_id).ok_or(DomainError::NotFound { id })?;
        let mut active: entity::ActiveModel = model.into();
        active.nonce = ActiveValue::Set(ciphertext.nonce);
        active.ciphertext = ActiveValue::Set(ciphertext.bytes);
        let _ = active.update(self.db.inner()).await?;
        Ok(())
    }
}
