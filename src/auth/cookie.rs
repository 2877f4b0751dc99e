// src/auth/cookie.rs
//! Session cookie lifecycle
//!
//! The session token travels in an HTTP-only cookie. Everything that sets
//! or clears it goes through these helpers so the attributes stay in sync:
//! a clear with a different Path would leave the login-time cookie behind
//! in the browser.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time, Cookie, SameSite};

use super::token::SESSION_TTL_HOURS;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "auth-token";

/// Build the session cookie set at login/signup/OAuth success
///
/// Max-Age matches the signed token's exp.
pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(SESSION_TTL_HOURS))
        .build()
}

/// Build the cookie write that removes the session cookie
///
/// Empty value, Max-Age=0, and the same Path=/ used at set time.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Extract the session token from a request's Cookie header
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    for cookie in Cookie::split_parse(raw.to_string()).flatten() {
        if cookie.name() == SESSION_COOKIE && !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    None
}

/// Serialize a cookie into a Set-Cookie header value
pub fn set_cookie_header(cookie: &Cookie<'_>) -> Option<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).ok()
}
