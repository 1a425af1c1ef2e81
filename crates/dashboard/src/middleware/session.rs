//! Session cookie handling.
//!
//! The WMS API owns the session: it issues an HTTP-only `jwt` cookie on
//! login and verifies it on every call. The dashboard re-issues that cookie
//! to the browser, forwards it upstream, and only ever checks its presence
//! for routing - the value is never parsed or validated locally, and there is
//! no expiry or refresh logic.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite};

/// Name of the session cookie, as issued by the WMS API.
pub const SESSION_COOKIE_NAME: &str = "jwt";

/// Opaque session token carried between browser and API.
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// `Cookie` header value for forwarding the session upstream.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE_NAME}={}", self.0)
    }
}

// Redact the token from logs.
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

/// Find the session cookie in a request's headers.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        let cookie = Cookie::parse(pair).ok()?;
        if cookie.name() == SESSION_COOKIE_NAME {
            Some(SessionToken::new(cookie.value().to_string()))
        } else {
            None
        }
    })
}

/// Build the browser-facing session cookie from the token the API issued.
#[must_use]
pub fn session_cookie(token: &SessionToken) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.value().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Build an expired cookie that removes the session from the browser.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::ZERO)
        .build()
}

/// Extractor that requires the session cookie to be present.
///
/// The gate is presence-only: verification happens on the API with every
/// proxied call. Missing cookie redirects page navigations to the login
/// page; table-fragment requests (`…/rows`) get a bare 401 instead.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession(token): RequireSession,
/// ) -> impl IntoResponse {
///     // token is forwarded to the WMS API
/// }
/// ```
pub struct RequireSession(pub SessionToken);

/// Error returned when the session cookie is absent.
pub enum SessionRejection {
    /// Redirect to the login page (for page navigations).
    RedirectToLogin,
    /// Unauthorized response (for fragment requests).
    Unauthorized,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_headers(&parts.headers).map(Self).ok_or_else(|| {
            if parts.uri.path().ends_with("/rows") {
                SessionRejection::Unauthorized
            } else {
                SessionRejection::RedirectToLogin
            }
        })
    }
}
