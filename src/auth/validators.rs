// src/auth/validators.rs

use super::models::{LoginRequest, SignupRequest};
use super::password::MIN_PASSWORD_LENGTH;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Authentication Validators
// ============================================================================

/// Loose structural check, the mail server has the final word
pub fn is_valid_email(email: &str) -> bool {
    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed.len() > 255 {
        return false;
    }
    match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.')
        }
        None => false,
    }
}

pub struct SignupValidator;

impl Validator<SignupRequest> for SignupValidator {
    fn validate(&self, data: &SignupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Validate email
        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        } else if !is_valid_email(&data.email) {
            result.add_error("email", "Email must be valid");
        }

        // Validate password
        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        } else if data.password.len() < MIN_PASSWORD_LENGTH {
            result.add_error(
                "password",
                "Password must be at least 8 characters",
            );
        }

        // Validate name if provided
        if let Some(name) = &data.name {
            if name.len() > 100 {
                result.add_error("name", "Name must be less than 100 characters");
            }
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        }

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}
