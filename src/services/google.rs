// src/services/google.rs
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::common::config::AppConfig;
use crate::common::id_generator::generate_raw_id;
use crate::common::ApiError;

/// Google OAuth 2.0 endpoints (HTTPS only)
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Length of the CSRF state parameter (32 Crockford chars, 160 bits)
const STATE_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("Google OAuth not configured: {0} is not set")]
    NotConfigured(&'static str),

    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<GoogleError> for ApiError {
    fn from(e: GoogleError) -> Self {
        match e {
            GoogleError::NotConfigured(_) => ApiError::ConfigError(e.to_string()),
            GoogleError::OAuthFailed(_)
            | GoogleError::RequestFailed(_)
            | GoogleError::SerializationError(_) => ApiError::UpstreamError(e.to_string()),
        }
    }
}

/// Authorization URL plus the CSRF state embedded in it
///
/// The caller persists the state so the callback can prove the round trip
/// started here.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// Identity record from the userinfo endpoint
///
/// Only email and sub are guaranteed; the rest depends on the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    pub email: String,
    #[serde(alias = "id")]
    pub sub: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthService {
    config: Arc<AppConfig>,
    client: Client,
}

impl GoogleOAuthService {
    pub fn new(config: Arc<AppConfig>, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the Google authorization URL with a fresh CSRF state
    ///
    /// access_type=offline and prompt=consent together guarantee a refresh
    /// token even for returning users. The redirect_uri is taken verbatim
    /// from configuration and percent-encoded as a query value.
    pub fn authorization_url(&self) -> Result<AuthorizationRequest, GoogleError> {
        let client_id = self
            .config
            .google_client_id
            .as_deref()
            .ok_or(GoogleError::NotConfigured("GOOGLE_CLIENT_ID"))?;
        let redirect_uri = self
            .config
            .google_redirect_uri
            .as_deref()
            .ok_or(GoogleError::NotConfigured("GOOGLE_REDIRECT_URI"))?;

        let state = generate_raw_id(STATE_LENGTH);
        let scope_param = "email profile";

        let url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=offline&prompt=consent",
            AUTH_ENDPOINT,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(scope_param),
            urlencoding::encode(&state),
        );

        debug!("Generated Google OAuth authorization URL");
        Ok(AuthorizationRequest { url, state })
    }

    /// Exchange an authorization code for tokens
    ///
    /// Error messages carry the upstream status, never the code or the
    /// client secret.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError> {
        let client_id = self
            .config
            .google_client_id
            .as_deref()
            .ok_or(GoogleError::NotConfigured("GOOGLE_CLIENT_ID"))?;
        let client_secret = self
            .config
            .google_client_secret
            .as_deref()
            .ok_or(GoogleError::NotConfigured("GOOGLE_CLIENT_SECRET"))?;
        let redirect_uri = self
            .config
            .google_redirect_uri
            .as_deref()
            .ok_or(GoogleError::NotConfigured("GOOGLE_REDIRECT_URI"))?;

        let params = [
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|_| {
                GoogleError::RequestFailed("token endpoint unreachable".to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            error!(http_status = %status, "Token exchange failed");
            return Err(GoogleError::OAuthFailed(format!(
                "token endpoint returned HTTP {}",
                status
            )));
        }

        let token_response = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))?;

        info!(
            has_refresh_token = token_response.refresh_token.is_some(),
            "Successfully exchanged authorization code for tokens"
        );
        Ok(token_response)
    }

    /// Fetch the user's identity with an access token
    pub async fn user_info(&self, access_token: &str) -> Result<GoogleUserInfo, GoogleError> {
        let response = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|_| {
                GoogleError::RequestFailed("userinfo endpoint unreachable".to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            error!(http_status = %status, "Userinfo request failed");
            return Err(GoogleError::RequestFailed(format!(
                "userinfo endpoint returned HTTP {}",
                status
            )));
        }

        let user_info = response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))?;

        debug!("Fetched Google user info");
        Ok(user_info)
    }
}
