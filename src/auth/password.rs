// src/auth/password.rs
//! Password hashing and verification
//!
//! bcrypt with a per-hash random salt, so the same password never hashes
//! to the same string twice.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::common::ApiError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password for storage
///
/// Rejects empty or too-short passwords before hashing.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    if password.is_empty() {
        return Err(ApiError::ValidationError(
            "Password is required".to_string(),
        ));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    hash(password, DEFAULT_COST)
        .map_err(|_| ApiError::InternalServer("Failed to hash password".to_string()))
}

/// Check a password against a stored hash
///
/// Case-sensitive; false for a wrong or empty password. A structurally
/// invalid stored hash is an error, not a silent mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, ApiError> {
    if password.is_empty() {
        return Ok(false);
    }

    verify(password, password_hash)
        .map_err(|_| ApiError::InternalServer("Stored password hash is invalid".to_string()))
}
