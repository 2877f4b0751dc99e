//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - JWT session token signing and verification
//! - Password hashing and verification
//! - Session cookie lifecycle

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::auth::token::{TokenError, TokenService};
    use chrono::Duration;

    const TEST_SECRET: &str = "test_secret_key";

    // ============================================================================
    // Token Service Tests
    // ============================================================================

    #[test]
    fn test_token_round_trip() {
        let service = TokenService::new(TEST_SECRET);

        let token = service
            .sign("U_K7NP3X", "user@example.com")
            .expect("should sign");
        let claims = service.verify(&token).expect("should verify");

        assert_eq!(claims.sub, "U_K7NP3X");
        assert_eq!(claims.email, "user@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_round_trip_with_unicode_values() {
        let service = TokenService::new(TEST_SECRET);

        let token = service
            .sign("U_K7NP3X", "日記@example.com 📓")
            .expect("should sign");
        let claims = service.verify(&token).expect("should verify");

        assert_eq!(claims.email, "日記@example.com 📓");
    }

    #[test]
    fn test_signing_rejects_empty_identity() {
        let service = TokenService::new(TEST_SECRET);

        assert_eq!(
            service.sign("", "user@example.com").unwrap_err(),
            TokenError::EmptyPayload
        );
        assert_eq!(
            service.sign("U_K7NP3X", "").unwrap_err(),
            TokenError::EmptyPayload
        );
        assert_eq!(service.sign("  ", "  ").unwrap_err(), TokenError::EmptyPayload);
    }

    #[test]
    fn test_expired_token_fails_verification() {
        let service = TokenService::new(TEST_SECRET);

        // Well-formed but already past its exp
        let token = service
            .sign_with_ttl("U_K7NP3X", "user@example.com", Duration::hours(-1))
            .expect("should sign");

        assert_eq!(service.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_malformed_token_fails_verification() {
        let service = TokenService::new(TEST_SECRET);

        assert_eq!(
            service.verify("not-a-jwt").unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(
            service.verify("only.two").unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(service.verify("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let service = TokenService::new(TEST_SECRET);
        let other = TokenService::new("a_completely_different_secret");

        let token = service
            .sign("U_K7NP3X", "user@example.com")
            .expect("should sign");

        assert_eq!(other.verify(&token).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn test_tampering_anywhere_in_signature_fails() {
        let service = TokenService::new(TEST_SECRET);

        let token = service
            .sign("U_K7NP3X", "user@example.com")
            .expect("should sign");

        let signature_start = token.rfind('.').expect("jwt has three segments") + 1;
        let signature_len = token.len() - signature_start;
        assert!(signature_len > 2);

        // Flip one character at every position in the signature segment,
        // middle included: base64 padding quirks must not mask mid-segment
        // edits.
        for offset in 0..signature_len {
            let index = signature_start + offset;
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).expect("still utf8");

            if tampered == token {
                continue;
            }

            assert!(
                service.verify(&tampered).is_err(),
                "tampered signature at offset {} must not verify",
                offset
            );
        }
    }

    #[test]
    fn test_tampered_payload_fails_verification() {
        let service = TokenService::new(TEST_SECRET);

        let token = service
            .sign("U_K7NP3X", "user@example.com")
            .expect("should sign");

        // Swap out the payload segment wholesale
        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!("{}.eyJzdWIiOiJVX0ZPUkdFRCJ9.{}", parts[0], parts[2]);

        assert!(service.verify(&forged).is_err());
    }

    // ============================================================================
    // Password Tests
    // ============================================================================

    #[test]
    fn test_password_round_trip() {
        let hash = password::hash_password("correct horse battery").expect("should hash");

        assert!(password::verify_password("correct horse battery", &hash).unwrap());
        assert!(!password::verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_password_verification_is_case_sensitive() {
        let hash = password::hash_password("Password123").expect("should hash");

        assert!(password::verify_password("Password123", &hash).unwrap());
        assert!(!password::verify_password("password123", &hash).unwrap());
    }

    #[test]
    fn test_empty_password_never_verifies() {
        let hash = password::hash_password("something-long").expect("should hash");

        assert!(!password::verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_hashing_salts_every_call() {
        let first = password::hash_password("same password").expect("should hash");
        let second = password::hash_password("same password").expect("should hash");

        assert_ne!(first, second, "same input must hash differently across calls");
    }

    #[test]
    fn test_hashing_rejects_short_passwords() {
        assert!(password::hash_password("").is_err());
        assert!(password::hash_password("short").is_err());
        assert!(password::hash_password("1234567").is_err());
    }

    #[test]
    fn test_invalid_stored_hash_is_an_error_not_false() {
        let result = password::verify_password("whatever", "not-a-bcrypt-hash");
        assert!(result.is_err());
    }

    // ============================================================================
    // Session Cookie Tests
    // ============================================================================

    #[test]
    fn test_session_cookie_attributes() {
        let c = cookie::session_cookie("some.jwt.token");

        assert_eq!(c.name(), "auth-token");
        assert_eq!(c.value(), "some.jwt.token");
        assert_eq!(c.http_only(), Some(true));
        assert_eq!(c.path(), Some("/"));
        // Max-Age matches the token TTL
        assert_eq!(
            c.max_age(),
            Some(::cookie::time::Duration::hours(token::SESSION_TTL_HOURS))
        );
    }

    #[test]
    fn test_clear_cookie_matches_set_attributes() {
        let c = cookie::clear_session_cookie();

        assert_eq!(c.name(), "auth-token");
        assert_eq!(c.value(), "");
        assert_eq!(c.max_age(), Some(::cookie::time::Duration::ZERO));
        // Path must equal the one used at set time or the browser keeps
        // the original cookie
        assert_eq!(c.path(), Some("/"));
    }

    #[test]
    fn test_session_token_extraction_from_headers() {
        use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; auth-token=abc.def.ghi; lang=en"),
        );

        assert_eq!(
            cookie::session_token_from_headers(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_missing_or_empty_session_cookie_yields_none() {
        use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

        let headers = HeaderMap::new();
        assert_eq!(cookie::session_token_from_headers(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(cookie::session_token_from_headers(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("auth-token="));
        assert_eq!(cookie::session_token_from_headers(&headers), None);
    }

    // ============================================================================
    // Model Tests
    // ============================================================================

    #[test]
    fn test_password_hash_never_serializes() {
        let user = models::User {
            id: "U_K7NP3X".to_string(),
            email: "user@example.com".to_string(),
            name: Some("Test User".to_string()),
            avatar: None,
            password_hash: Some("$2b$12$secret".to_string()),
            provider: None,
            provider_id: None,
            created_at: Some("2026-08-01".to_string()),
            updated_at: None,
        };

        let json = serde_json::to_string(&user).expect("should serialize");
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$12$secret"));
    }

    #[test]
    fn test_email_validator_shape() {
        assert!(validators::is_valid_email("user@example.com"));
        assert!(validators::is_valid_email("first.last@sub.example.co"));
        assert!(!validators::is_valid_email("no-at-sign"));
        assert!(!validators::is_valid_email("@example.com"));
        assert!(!validators::is_valid_email("user@"));
        assert!(!validators::is_valid_email("user@nodot"));
        assert!(!validators::is_valid_email(""));
    }
}
