// src/auth/token.rs
//! Session token signing and verification
//!
//! Stateless HS256 JWTs carrying the user's identity. The secret is
//! injected at construction so tests can run against their own keys
//! without touching the process environment.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;

use super::models::Claims;

/// How long a session token stays valid after issue, in hours
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("token payload must not be empty")]
    EmptyPayload,

    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    Malformed,

    #[error("token could not be signed")]
    SigningFailed,
}

/// Signs and verifies session tokens with a symmetric secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: the default 60s leeway would accept tokens
        // that are already past their exp claim.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a session token for the given identity, valid for `ttl`
    ///
    /// Embeds `iat` and `exp` alongside the identity claims. Fails with
    /// `TokenError::EmptyPayload` when the identity is empty.
    pub fn sign_with_ttl(
        &self,
        user_id: &str,
        email: &str,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        if user_id.trim().is_empty() || email.trim().is_empty() {
            return Err(TokenError::EmptyPayload);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::SigningFailed)
    }

    /// Sign a session token with the default TTL
    pub fn sign(&self, user_id: &str, email: &str) -> Result<String, TokenError> {
        self.sign_with_ttl(user_id, email, Duration::hours(SESSION_TTL_HOURS))
    }

    /// Verify a session token and return its claims
    ///
    /// The whole signature segment is checked, `exp` must be in the
    /// future, and the token must have the expected three-segment shape.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}
