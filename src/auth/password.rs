use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hashes `plain` with a fresh random salt into an argon2 PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!("password hashing failed: {}", e)
        })?
        .to_string();
    Ok(hash)
}

/// Checks `plain` against a stored PHC string. An unparsable hash never
/// matches.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("pa55word").expect("hashing should succeed");
        let second = hash_password("pa55word").expect("hashing should succeed");
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password("pa55word", &first));
        assert!(verify_password("pa55word", &second));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("pa55word").expect("hashing should succeed");
        assert!(!verify_password("pa55wordx", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
        assert!(!verify_password("", ""));
    }
}
