//! Passphrase hashing with Argon2id.

use std::sync::OnceLock;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hash of a throwaway passphrase, made with the same parameters as real ones.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_passphrase("njordbreeze-dummy-passphrase").unwrap_or_default())
}

/// Hashes a passphrase into a PHC string with a fresh random salt.
pub fn hash_passphrase(passphrase: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(passphrase.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verifies a passphrase against a stored PHC string (constant-time).
///
/// A malformed stored hash verifies as `false`.
pub fn verify_passphrase(passphrase: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(passphrase.as_bytes(), &parsed)
        .is_ok()
}

/// Verifies against `hash`, or against a dummy hash when there is none.
///
/// Unknown accounts then cost the same Argon2 work as a wrong passphrase.
/// Always `false` without a hash.
pub fn verify_passphrase_or_dummy(passphrase: &str, hash: Option<&str>) -> bool {
    match hash {
        Some(hash) => verify_passphrase(passphrase, hash),
        None => {
            let _ = verify_passphrase(passphrase, dummy_hash());
            false
        }
    }
}
