// src/entries/validators.rs

use super::models::{CreateEntryRequest, UpdateEntryRequest};
use crate::common::{ValidationResult, Validator};

const MAX_TITLE_LENGTH: usize = 200;
const MAX_CONTENT_LENGTH: usize = 50_000;

// ============================================================================
// Diary Entry Validators
// ============================================================================

pub struct EntryValidator;

impl Validator<CreateEntryRequest> for EntryValidator {
    fn validate(&self, data: &CreateEntryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Validate title
        if data.title.trim().is_empty() {
            result.add_error("title", "Title is required");
        } else if data.title.len() > MAX_TITLE_LENGTH {
            result.add_error("title", "Title must be less than 200 characters");
        }

        // Validate content
        if data.content.trim().is_empty() {
            result.add_error("content", "Content is required");
        } else if data.content.len() > MAX_CONTENT_LENGTH {
            result.add_error("content", "Content must be less than 50000 characters");
        }

        result
    }
}

impl Validator<UpdateEntryRequest> for EntryValidator {
    fn validate(&self, data: &UpdateEntryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Check if at least one field is provided
        if data.title.is_none() && data.content.is_none() {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(title) = &data.title {
            if title.trim().is_empty() {
                result.add_error("title", "Title cannot be empty");
            } else if title.len() > MAX_TITLE_LENGTH {
                result.add_error("title", "Title must be less than 200 characters");
            }
        }

        if let Some(content) = &data.content {
            if content.trim().is_empty() {
                result.add_error("content", "Content cannot be empty");
            } else if content.len() > MAX_CONTENT_LENGTH {
                result.add_error("content", "Content must be less than 50000 characters");
            }
        }

        result
    }
}
