//! Authentication and profile calls.
//!
//! Login yields the API's `jwt` session cookie; the dashboard re-issues that
//! cookie to the browser and forwards it on every subsequent call. The token
//! value itself is never inspected.

use cookie::Cookie;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use stockdeck_core::{Role, UserId};

use super::{Profile, ProfileUpdate, WmsClient, WmsError};
use crate::middleware::session::{SESSION_COOKIE_NAME, SessionToken};

impl WmsClient {
    /// Authenticate with the API and return the session token it issued.
    ///
    /// # Errors
    ///
    /// Returns `WmsError::Api` with the server's message on invalid
    /// credentials, and `WmsError::MissingSessionCookie` if a 2xx response
    /// carried no `jwt` cookie.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, WmsError> {
        let body = serde_json::json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let response = self
            .send(Method::POST, "/auth/login", &[], None, Some(&body))
            .await?;

        session_token_from_response(&response).ok_or(WmsError::MissingSessionCookie)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `WmsError::Api` when the username is taken or the payload is
    /// rejected by the server.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn signup(
        &self,
        username: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<(), WmsError> {
        let body = serde_json::json!({
            "username": username,
            "password": password.expose_secret(),
            "role": role.code(),
        });

        self.send(Method::POST, "/auth/signup", &[], None, Some(&body))
            .await?;
        Ok(())
    }

    /// End the session on the API side.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` if the API rejects the call; the dashboard clears
    /// its cookie regardless.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &SessionToken) -> Result<(), WmsError> {
        self.mutate(Method::POST, "/auth/logout", token, None).await
    }

    /// Fetch the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns `WmsError::Api` with status 401 when the session cookie is no
    /// longer valid.
    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: &SessionToken) -> Result<Profile, WmsError> {
        self.fetch(Method::GET, "/auth/profile", &[], Some(token), None)
            .await
    }

    /// Update the current user's own username/password.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` if the API rejects the update.
    #[instrument(skip(self, token, update), fields(user_id = %id))]
    pub async fn update_profile(
        &self,
        token: &SessionToken,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<(), WmsError> {
        let body = serde_json::to_value(update)?;
        self.mutate(Method::PUT, &format!("/auth/profile/{id}"), token, Some(&body))
            .await
    }
}

/// Find the `jwt` cookie among a response's `Set-Cookie` headers.
fn session_token_from_response(response: &reqwest::Response) -> Option<SessionToken> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .find_map(|value| {
            let raw = value.to_str().ok()?;
            let cookie = Cookie::parse(raw).ok()?;
            if cookie.name() == SESSION_COOKIE_NAME {
                Some(SessionToken::new(cookie.value().to_string()))
            } else {
                None
            }
        })
}
