//! Password hashing
//!
//! Argon2id with the crate's default cost parameters and a fresh random salt
//! per hash. Hashes are stored as PHC strings, so the parameters travel with
//! the hash and can be raised later without invalidating existing accounts.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on a mismatch. A stored value that is not a valid
/// PHC string, or any other verifier failure, is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow!("Invalid password hash format: {}", e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("Password verification failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_uses_argon2id() {
        let hash = hash_password("hunter2").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("right").unwrap();
        assert!(verify_password("right", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash_is_error() {
        assert!(verify_password("pw", "plaintext-not-a-hash").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        /// Only the original password verifies against its stored hash.
        #[test]
        fn stored_hash_verifies_only_original(password in "[a-zA-Z0-9!@#$%^&*]{1,32}") {
            let hash = hash_password(&password).unwrap();

            prop_assert_ne!(&hash, &password);
            prop_assert!(verify_password(&password, &hash).unwrap());

            let altered = format!("{}x", password);
            prop_assert!(!verify_password(&altered, &hash).unwrap());
        }
    }
}
