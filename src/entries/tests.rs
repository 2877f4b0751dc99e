//! Tests for entries module
//!
//! These tests verify core diary entry functionality including:
//! - Pagination cursor encoding/decoding
//! - Entry validators

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    // ============================================================================
    // Cursor Tests
    // ============================================================================

    #[test]
    fn test_cursor_round_trip() {
        let cursor = models::EntryCursor {
            created_at: "2026-08-01 10:30:00".to_string(),
            id: "D_K7NP3X".to_string(),
        };

        let encoded = cursor.encode();
        let decoded = models::EntryCursor::decode(&encoded).expect("should decode");

        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_is_opaque_base64() {
        let cursor = models::EntryCursor {
            created_at: "2026-08-01 10:30:00".to_string(),
            id: "D_K7NP3X".to_string(),
        };

        // No raw timestamp or id visible in the wire form
        let encoded = cursor.encode();
        assert!(!encoded.contains("2026"));
        assert!(!encoded.contains("D_K7NP3X"));
    }

    #[test]
    fn test_cursor_rejects_garbage() {
        assert!(models::EntryCursor::decode("not base64 at all!").is_none());
        assert!(models::EntryCursor::decode("").is_none());
        // Valid base64, wrong inner shape
        assert!(models::EntryCursor::decode("aGVsbG8").is_none());
    }

    #[test]
    fn test_cursor_rejects_empty_components() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine as _;

        let missing_id = URL_SAFE_NO_PAD.encode("2026-08-01 10:30:00|");
        assert!(models::EntryCursor::decode(&missing_id).is_none());

        let missing_created = URL_SAFE_NO_PAD.encode("|D_K7NP3X");
        assert!(models::EntryCursor::decode(&missing_created).is_none());
    }

    // ============================================================================
    // Validator Tests
    // ============================================================================

    #[test]
    fn test_create_validator_accepts_valid_entry() {
        let request = models::CreateEntryRequest {
            title: "A quiet Tuesday".to_string(),
            content: "Rained all day. Finished the book.".to_string(),
        };

        let result = validators::EntryValidator.validate(&request);
        assert!(result.is_valid);
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn test_create_validator_requires_title() {
        let request = models::CreateEntryRequest {
            title: "   ".to_string(),
            content: "Some content".to_string(),
        };

        let result = validators::EntryValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn test_create_validator_requires_content() {
        let request = models::CreateEntryRequest {
            title: "Title".to_string(),
            content: String::new(),
        };

        let result = validators::EntryValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "content"));
    }

    #[test]
    fn test_create_validator_caps_title_length() {
        let request = models::CreateEntryRequest {
            title: "x".repeat(201),
            content: "Some content".to_string(),
        };

        let result = validators::EntryValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn test_update_validator_requires_some_field() {
        let request = models::UpdateEntryRequest {
            title: None,
            content: None,
        };

        let result = validators::EntryValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "general"));
    }

    #[test]
    fn test_update_validator_rejects_blank_title() {
        let request = models::UpdateEntryRequest {
            title: Some("  ".to_string()),
            content: None,
        };

        let result = validators::EntryValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn test_update_validator_accepts_single_field() {
        let request = models::UpdateEntryRequest {
            title: None,
            content: Some("Rewrote the whole day from memory.".to_string()),
        };

        let result = validators::EntryValidator.validate(&request);
        assert!(result.is_valid);
    }
}
