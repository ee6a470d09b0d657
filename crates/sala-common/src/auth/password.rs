//! Password hashing and verification utilities
//!
//! Uses Argon2id for secure password hashing (OWASP recommended).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sala_core::DomainError;

use crate::error::AppError;

/// Minimum password length in characters
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum password length in characters
pub const PASSWORD_MAX_LEN: usize = 128;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Validate password strength
///
/// A password must be 8-128 characters long and contain at least one
/// letter and one digit.
///
/// # Errors
/// Returns `DomainError::WeakPassword` describing the first rule violated
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let weak = |msg: &str| Err(AppError::Domain(DomainError::WeakPassword(msg.to_string())));
    let len = password.chars().count();

    if len < PASSWORD_MIN_LEN {
        return weak("must be at least 8 characters long");
    }

    if len > PASSWORD_MAX_LEN {
        return weak("must be at most 128 characters long");
    }

    if !password.chars().any(char::is_alphabetic) {
        return weak("must contain at least one letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return weak("must contain at least one digit");
    }

    Ok(())
}
