// src/settings/validators.rs

use super::models::UpdateProfileRequest;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Settings Validators
// ============================================================================

pub struct ProfileValidator;

impl Validator<UpdateProfileRequest> for ProfileValidator {
    fn validate(&self, data: &UpdateProfileRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Check if at least one field is provided
        if data.name.is_none() && data.avatar.is_none() {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(name) = &data.name {
            if name.len() > 100 {
                result.add_error("name", "Name must be less than 100 characters");
            }
        }

        if let Some(avatar) = &data.avatar {
            if avatar.len() > 2000 {
                result.add_error("avatar", "Avatar URL must be less than 2000 characters");
            }
        }

        result
    }
}
