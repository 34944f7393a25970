//! Back-office account passwords: Argon2id PHC hashes and the policy new
//! passwords must meet. Shared by the users API and `hypeblog create-user`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use hypeblog_core::error::CoreError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Enforce the password policy for new accounts.
pub fn check_password_policy(password: &str) -> Result<(), CoreError> {
    if password.trim().is_empty() {
        return Err(CoreError::Validation("Password must not be blank".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))
}

/// `Ok(false)` for a wrong password; an unreadable stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, CoreError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| CoreError::Internal(format!("Stored password hash is invalid: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::Internal(format!("Password check failed: {e}"))),
    }
}
