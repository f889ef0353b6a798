use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, OsRng, rand_core::RngCore},
};
use hkdf::Hkdf;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use uuid::Uuid;

use super::error::DomainError;

pub const NONCE_LEN: usize = 12;

/// Derives a per-tenant data key from the operator master key via
/// HKDF-SHA256, so compromising one tenant's derived key never exposes
/// the master key or another tenant's data key.
fn derive_tenant_key(master_key: &SecretString, tenant_id: Uuid) -> Result<[u8; 32], DomainError> {
    let hk = Hkdf::<Sha256>::new(Some(tenant_id.as_bytes()), master_key.expose_secret().as_bytes());
    let mut out = [0u8; 32];
    hk.expand(b"control-core-credential-vault", &mut out).map_err(|_| DomainError::Crypto)?;
    Ok(out)
}

pub struct Ciphertext {
    pub nonce: Vec<u8>,
    pub bytes: Vec<u8>,
}

/// # Errors
///
/// Returns [`DomainError::Crypto`] if the AEAD seal operation fails.
pub fn seal(master_key: &SecretString, tenant_id: Uuid, plaintext: &SecretString) -> Result<Ciphertext, DomainError> {
    let key_bytes = derive_tenant_key(master_key, tenant_id)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);
    let bytes = cipher
        .encrypt(nonce, plaintext.expose_secret().as_bytes())
        .map_err(|_| DomainError::Crypto)?;
    Ok(Ciphertext { nonce: nonce_bytes.to_vec(), bytes })
}

/// # Errors
///
/// Returns [`DomainError::Crypto`] if the AEAD open operation fails,
/// which also covers ciphertext tampering and a wrong tenant/key pair.
pub fn open(master_key: &SecretString, tenant_id: Uuid, ciphertext: &Ciphertext) -> Result<SecretString, DomainError> {
    let key_bytes = derive_tenant_key(master_key, tenant_id)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    let nonce = Nonce::from_slice(&ciphertext.nonce);
    let plaintext = cipher.decrypt(nonce, ciphertext.bytes.as_slice()).map_err(|_| DomainError::Crypto)?;
    let plaintext = String::from_utf8(plaintext).map_err(|_| DomainError::Crypto)?;
    Ok(SecretString::from(plaintext))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_secret() {
        let master_key = SecretString::from("operator-master-key-material");
        let tenant_id = Uuid::new_v4();
        let secret = SecretString::from("super-secret-api-token");
        let ciphertext = seal(&master_key, tenant_id, &secret).unwrap();
        let opened = open(&master_key, tenant_id, &ciphertext).unwrap();
        assert_eq!(opened.expose_secret(), secret.expose_secret());
    }

    #[test]
    fn rejects_ciphertext_opened_under_a_different_tenant() {
        let master_key = SecretString::from("operator-master-key-material");
        let secret = SecretString::from("super-secret-api-token");
        let ciphertext = seal(&master_key, Uuid::new_v4(), &secret).unwrap();
        assert!(open(&master_key, Uuid::new_v4(), &ciphertext).is_err());
    }
}
