// Services module - external integrations and shared infrastructure

pub mod google;
pub mod oauth_state;

pub use google::{AuthorizationRequest, GoogleError, GoogleOAuthService, GoogleUserInfo, TokenResponse};
pub use oauth_state::OAuthStateStore;
