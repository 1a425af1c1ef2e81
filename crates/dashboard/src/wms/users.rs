//! User management calls.

use reqwest::Method;
use tracing::instrument;

use stockdeck_core::UserId;

use super::{NewUser, User, UserUpdate, WmsClient, WmsError};
use crate::middleware::session::SessionToken;

impl WmsClient {
    /// List users, optionally filtered by a substring search term.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` on transport failure or a non-2xx response - the
    /// API answers 403 for non-admin sessions.
    #[instrument(skip(self, token), fields(search = %search))]
    pub async fn list_users(
        &self,
        token: &SessionToken,
        search: &str,
    ) -> Result<Vec<User>, WmsError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if !search.is_empty() {
            query.push(("search", search));
        }
        self.fetch(Method::GET, "/user", &query, Some(token), None).await
    }

    /// Create a user account.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` if the username is taken (server-enforced
    /// uniqueness) or the payload is rejected.
    #[instrument(skip(self, token, user), fields(username = %user.username))]
    pub async fn create_user(&self, token: &SessionToken, user: &NewUser) -> Result<(), WmsError> {
        let body = serde_json::to_value(user)?;
        self.mutate(Method::POST, "/user", token, Some(&body)).await
    }

    /// Update a user's fields, or their password when the change-password
    /// dialog submits one.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` if the API rejects the update.
    #[instrument(skip(self, token, update), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        token: &SessionToken,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<(), WmsError> {
        let body = serde_json::to_value(update)?;
        self.mutate(Method::PUT, &format!("/user/{id}"), token, Some(&body))
            .await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` if the API rejects the delete.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn delete_user(&self, token: &SessionToken, id: UserId) -> Result<(), WmsError> {
        self.mutate(Method::DELETE, &format!("/user/{id}"), token, None)
            .await
    }
}
