use sha2::{Digest, Sha256};

/// The registration token is a bearer credential, not a secret the
/// coordinator ever needs to read back — only its hash is persisted,
/// the same one-way relationship `credential-vault` keeps between a
/// master key and the ciphertexts it seals.
#[must_use]
pub fn hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[must_use]
pub fn verify(token: &str, stored_hash: &str) -> bool {
    hash(token) == stored_hash
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_token_that_produced_the_hash() {
        let token = uuid::Uuid::new_v4().to_string();
        assert!(verify(&token, &hash(&token)));
    }

    #[test]
    fn verify_rejects_any_other_token() {
        let hashed = hash("correct-token");
        assert!(!verify("wrong-token", &hashed));
    }
}
