// src/guard_middleware.rs
//! Edge authorization middleware
//!
//! Runs once per request before any handler. Classifies the path against
//! an ordered rule table, checks the session cookie, and answers with one
//! of: pass through, 307 redirect, or pass/redirect plus a cookie-clearing
//! Set-Cookie write.
//!
//! The decision itself is a pure function over (path, session state), so
//! the whole route/redirect/cookie matrix is unit-testable without an HTTP
//! server; the axum adapter at the bottom only translates the decision
//! into response writes.

use axum::{
    extract::{Extension, Request},
    http::{header::LOCATION, header::SET_COOKIE, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::auth::cookie::{clear_session_cookie, session_token_from_headers, set_cookie_header};
use crate::common::AppState;

/// Where an unauthenticated or legacy request gets sent
const LOGIN_PATH: &str = "/auth/login";
/// Canonical authenticated home
const HOME_PATH: &str = "/diary";

// ============================================================================
// Route classification
// ============================================================================

/// How the middleware treats a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Old login path, redirected before any auth check
    LegacyLogin,
    /// Old home path, relocated based on session validity
    Dashboard,
    /// Requires a valid session
    Protected,
    /// Login/signup pages: public, but an authenticated user is bounced home
    AuthPage,
    /// Landing page and anything unmapped: plain pass-through
    Public,
}

/// Ordered rule table, first match wins
///
/// /login must precede the protected rules: classifying it as protected
/// would bounce it to the login page with a redirect back to /login, a
/// loop. Paths match on the exact prefix or a nested segment under it.
const ROUTE_RULES: &[(&str, RouteClass)] = &[
    ("/login", RouteClass::LegacyLogin),
    ("/dashboard", RouteClass::Dashboard),
    ("/diary", RouteClass::Protected),
    ("/settings", RouteClass::Protected),
    ("/auth/login", RouteClass::AuthPage),
    ("/auth/signup", RouteClass::AuthPage),
];

/// True when path is `prefix` itself or nested under it
fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix || path.starts_with(&format!("{}/", prefix))
}

/// Classify a pathname; every path maps to exactly one class
pub fn classify(path: &str) -> RouteClass {
    for (prefix, class) in ROUTE_RULES {
        if matches_prefix(path, prefix) {
            return *class;
        }
    }
    RouteClass::Public
}

// ============================================================================
// Decision core
// ============================================================================

/// Session cookie status, computed once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No auth-token cookie on the request
    Missing,
    /// Cookie present and the token verified
    Valid,
    /// Cookie present but the token failed verification
    Invalid,
}

/// What the middleware does with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Hand the request to the router
    Pass { clear_cookie: bool },
    /// 307 to `location`
    Redirect { location: String, clear_cookie: bool },
}

/// Login redirect carrying the original path for post-login return
fn login_redirect_with_return(path: &str) -> String {
    format!("{}?redirect={}", LOGIN_PATH, urlencoding::encode(path))
}

/// Decide how to handle a request
///
/// Invariants:
/// - /login redirects before any auth check.
/// - A public path never redirects to the login page on an invalid token.
/// - Every branch that sees an invalid token clears the cookie.
pub fn decide(path: &str, session: SessionState) -> RouteDecision {
    let class = classify(path);

    // Legacy login path: unconditional, session never consulted
    if class == RouteClass::LegacyLogin {
        return RouteDecision::Redirect {
            location: LOGIN_PATH.to_string(),
            clear_cookie: false,
        };
    }

    // Old dashboard: relocate to /diary when the session holds up,
    // otherwise to login with a return pointer. Short-circuits the rest.
    if class == RouteClass::Dashboard {
        return match session {
            SessionState::Valid => RouteDecision::Redirect {
                location: HOME_PATH.to_string(),
                clear_cookie: false,
            },
            SessionState::Missing => RouteDecision::Redirect {
                location: login_redirect_with_return(path),
                clear_cookie: false,
            },
            SessionState::Invalid => RouteDecision::Redirect {
                location: login_redirect_with_return(path),
                clear_cookie: true,
            },
        };
    }

    match session {
        SessionState::Missing => {
            if class == RouteClass::Protected {
                RouteDecision::Redirect {
                    location: login_redirect_with_return(path),
                    clear_cookie: false,
                }
            } else {
                RouteDecision::Pass {
                    clear_cookie: false,
                }
            }
        }
        SessionState::Valid => {
            // A signed-in user has no business on the login/signup pages
            if class == RouteClass::AuthPage {
                RouteDecision::Redirect {
                    location: HOME_PATH.to_string(),
                    clear_cookie: false,
                }
            } else {
                RouteDecision::Pass {
                    clear_cookie: false,
                }
            }
        }
        SessionState::Invalid => {
            // The stale cookie goes away on every one of these branches.
            // Only protected paths redirect: sending a public page to the
            // login page on a bad cookie would loop the login page itself.
            if class == RouteClass::Protected {
                RouteDecision::Redirect {
                    location: LOGIN_PATH.to_string(),
                    clear_cookie: true,
                }
            } else {
                RouteDecision::Pass { clear_cookie: true }
            }
        }
    }
}

// ============================================================================
// Axum adapter
// ============================================================================

/// Translate a decision into response writes
fn apply_decision(decision: RouteDecision, inner: Option<Response>) -> Response {
    let (mut response, clear_cookie) = match decision {
        RouteDecision::Pass { clear_cookie } => (
            inner.unwrap_or_else(|| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
            clear_cookie,
        ),
        RouteDecision::Redirect {
            location,
            clear_cookie,
        } => {
            let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
            match location.parse() {
                Ok(value) => {
                    response.headers_mut().insert(LOCATION, value);
                }
                Err(_) => {
                    // A redirect target we cannot express as a header is a
                    // bug in the rule table, not a user error
                    warn!(location = %location, "Unrepresentable redirect location");
                    response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            }
            (response, clear_cookie)
        }
    };

    if clear_cookie {
        if let Some(value) = set_cookie_header(&clear_session_cookie()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

/// Middleware entry point, applied to the whole router
pub async fn guard_middleware(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let session = match session_token_from_headers(request.headers()) {
        None => SessionState::Missing,
        Some(token) => {
            let state = state_lock.read().await.clone();
            match state.token_service.verify(&token) {
                Ok(_) => SessionState::Valid,
                Err(e) => {
                    // Verification failures become redirects and cookie
                    // clears, never 500s
                    debug!(path = %path, error = %e, "Session token failed verification");
                    SessionState::Invalid
                }
            }
        }
    };

    match decide(&path, session) {
        decision @ RouteDecision::Redirect { .. } => {
            debug!(path = %path, ?decision, "Guard redirecting request");
            apply_decision(decision, None)
        }
        RouteDecision::Pass { clear_cookie } => {
            let inner = next.run(request).await;
            apply_decision(RouteDecision::Pass { clear_cookie }, Some(inner))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    #[test]
    fn test_classify_maps_every_category() {
        assert_eq!(classify("/login"), RouteClass::LegacyLogin);
        assert_eq!(classify("/login/old"), RouteClass::LegacyLogin);
        assert_eq!(classify("/dashboard"), RouteClass::Dashboard);
        assert_eq!(classify("/dashboard/stats"), RouteClass::Dashboard);
        assert_eq!(classify("/diary"), RouteClass::Protected);
        assert_eq!(classify("/diary/D_K7NP3X"), RouteClass::Protected);
        assert_eq!(classify("/settings"), RouteClass::Protected);
        assert_eq!(classify("/settings/profile"), RouteClass::Protected);
        assert_eq!(classify("/auth/login"), RouteClass::AuthPage);
        assert_eq!(classify("/auth/signup"), RouteClass::AuthPage);
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/about"), RouteClass::Public);
        assert_eq!(classify("/api/diary"), RouteClass::Public);
    }

    #[test]
    fn test_classify_requires_segment_boundary() {
        // /diaryx is not /diary
        assert_eq!(classify("/diaryx"), RouteClass::Public);
        assert_eq!(classify("/settingsabc"), RouteClass::Public);
        assert_eq!(classify("/loginx"), RouteClass::Public);
    }

    // ------------------------------------------------------------------
    // Legacy and dashboard branches
    // ------------------------------------------------------------------

    #[test]
    fn test_legacy_login_redirects_regardless_of_session() {
        for session in [
            SessionState::Missing,
            SessionState::Valid,
            SessionState::Invalid,
        ] {
            let decision = decide("/login", session);
            assert_eq!(
                decision,
                RouteDecision::Redirect {
                    location: "/auth/login".to_string(),
                    clear_cookie: false,
                },
                "legacy /login must always land on /auth/login"
            );
        }
    }

    #[test]
    fn test_legacy_login_never_loops_back() {
        let decision = decide("/login", SessionState::Missing);
        match decision {
            RouteDecision::Redirect { location, .. } => {
                assert!(!location.starts_with("/login"));
                assert_eq!(location, "/auth/login");
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_dashboard_with_valid_session_goes_home() {
        assert_eq!(
            decide("/dashboard", SessionState::Valid),
            RouteDecision::Redirect {
                location: "/diary".to_string(),
                clear_cookie: false,
            }
        );
    }

    #[test]
    fn test_dashboard_without_session_goes_to_login_with_return() {
        assert_eq!(
            decide("/dashboard", SessionState::Missing),
            RouteDecision::Redirect {
                location: "/auth/login?redirect=%2Fdashboard".to_string(),
                clear_cookie: false,
            }
        );
    }

    #[test]
    fn test_dashboard_subpath_keeps_literal_return_target() {
        assert_eq!(
            decide("/dashboard/stats", SessionState::Missing),
            RouteDecision::Redirect {
                location: "/auth/login?redirect=%2Fdashboard%2Fstats".to_string(),
                clear_cookie: false,
            }
        );
    }

    #[test]
    fn test_dashboard_with_invalid_session_clears_cookie() {
        assert_eq!(
            decide("/dashboard", SessionState::Invalid),
            RouteDecision::Redirect {
                location: "/auth/login?redirect=%2Fdashboard".to_string(),
                clear_cookie: true,
            }
        );
    }

    // ------------------------------------------------------------------
    // Protected routes
    // ------------------------------------------------------------------

    #[test]
    fn test_protected_route_without_session_redirects_with_return() {
        let decision = decide("/diary", SessionState::Missing);
        assert_eq!(
            decision,
            RouteDecision::Redirect {
                location: "/auth/login?redirect=%2Fdiary".to_string(),
                clear_cookie: false,
            }
        );
    }

    #[test]
    fn test_protected_subpath_without_session_keeps_original_path() {
        assert_eq!(
            decide("/diary/D_K7NP3X", SessionState::Missing),
            RouteDecision::Redirect {
                location: "/auth/login?redirect=%2Fdiary%2FD_K7NP3X".to_string(),
                clear_cookie: false,
            }
        );
        assert_eq!(
            decide("/settings", SessionState::Missing),
            RouteDecision::Redirect {
                location: "/auth/login?redirect=%2Fsettings".to_string(),
                clear_cookie: false,
            }
        );
    }

    #[test]
    fn test_protected_route_with_valid_session_passes() {
        assert_eq!(
            decide("/diary", SessionState::Valid),
            RouteDecision::Pass {
                clear_cookie: false
            }
        );
        assert_eq!(
            decide("/settings", SessionState::Valid),
            RouteDecision::Pass {
                clear_cookie: false
            }
        );
    }

    #[test]
    fn test_protected_route_with_invalid_session_redirects_and_clears() {
        assert_eq!(
            decide("/diary", SessionState::Invalid),
            RouteDecision::Redirect {
                location: "/auth/login".to_string(),
                clear_cookie: true,
            }
        );
        assert_eq!(
            decide("/settings/profile", SessionState::Invalid),
            RouteDecision::Redirect {
                location: "/auth/login".to_string(),
                clear_cookie: true,
            }
        );
    }

    // ------------------------------------------------------------------
    // Auth pages and public routes
    // ------------------------------------------------------------------

    #[test]
    fn test_auth_page_with_valid_session_redirects_home() {
        assert_eq!(
            decide("/auth/login", SessionState::Valid),
            RouteDecision::Redirect {
                location: "/diary".to_string(),
                clear_cookie: false,
            }
        );
        assert_eq!(
            decide("/auth/signup", SessionState::Valid),
            RouteDecision::Redirect {
                location: "/diary".to_string(),
                clear_cookie: false,
            }
        );
    }

    #[test]
    fn test_home_page_with_valid_session_is_not_redirected() {
        // Bare / is public but not an auth page: no bounce to /diary
        assert_eq!(
            decide("/", SessionState::Valid),
            RouteDecision::Pass {
                clear_cookie: false
            }
        );
    }

    #[test]
    fn test_auth_page_with_invalid_session_passes_without_loop() {
        // Treated as unauthenticated: no redirect back to /auth/login,
        // but the stale cookie is removed
        assert_eq!(
            decide("/auth/login", SessionState::Invalid),
            RouteDecision::Pass { clear_cookie: true }
        );
        assert_eq!(
            decide("/auth/signup", SessionState::Invalid),
            RouteDecision::Pass { clear_cookie: true }
        );
    }

    #[test]
    fn test_public_route_with_invalid_session_passes_and_clears() {
        assert_eq!(
            decide("/", SessionState::Invalid),
            RouteDecision::Pass { clear_cookie: true }
        );
        assert_eq!(
            decide("/about", SessionState::Invalid),
            RouteDecision::Pass { clear_cookie: true }
        );
    }

    #[test]
    fn test_public_route_without_session_passes_untouched() {
        assert_eq!(
            decide("/", SessionState::Missing),
            RouteDecision::Pass {
                clear_cookie: false
            }
        );
        assert_eq!(
            decide("/auth/login", SessionState::Missing),
            RouteDecision::Pass {
                clear_cookie: false
            }
        );
    }

    #[test]
    fn test_unmapped_route_defaults_to_pass_through() {
        assert_eq!(
            decide("/api/diary", SessionState::Valid),
            RouteDecision::Pass {
                clear_cookie: false
            }
        );
        assert_eq!(
            decide("/api/diary", SessionState::Missing),
            RouteDecision::Pass {
                clear_cookie: false
            }
        );
    }

    #[test]
    fn test_every_invalid_session_branch_clears_the_cookie() {
        // The browser must never be left holding a rejected cookie
        for path in ["/", "/about", "/diary", "/settings", "/auth/login", "/dashboard"] {
            let clears = match decide(path, SessionState::Invalid) {
                RouteDecision::Pass { clear_cookie } => clear_cookie,
                RouteDecision::Redirect { clear_cookie, .. } => clear_cookie,
            };
            assert!(clears, "invalid session on {} must clear the cookie", path);
        }
    }

    // ------------------------------------------------------------------
    // Response adapter
    // ------------------------------------------------------------------

    #[test]
    fn test_redirects_are_307() {
        let response = apply_decision(
            RouteDecision::Redirect {
                location: "/auth/login".to_string(),
                clear_cookie: false,
            },
            None,
        );

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth/login")
        );
    }

    #[test]
    fn test_cookie_clear_write_has_full_path_and_zero_max_age() {
        let response = apply_decision(
            RouteDecision::Redirect {
                location: "/auth/login".to_string(),
                clear_cookie: true,
            },
            None,
        );

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("cookie clear must produce a Set-Cookie header");

        assert!(set_cookie.starts_with("auth-token="));
        assert!(set_cookie.contains("Max-Age=0"));
        // Same Path=/ as the login-time cookie, or the browser keeps both
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("HttpOnly"));
    }
}
