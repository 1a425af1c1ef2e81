//! Warehouse management API client.
//!
//! All persistence and business logic live behind the WMS REST API
//! (`/api/v1`); this module is the dashboard's only way to reach it. Requests
//! carry the browser's session cookie, bodies are JSON, and every non-2xx
//! status is surfaced as one uniform failure carrying the server's message.

mod auth;
mod error;
mod orders;
mod products;
mod types;
mod users;

pub use error::WmsError;
pub use orders::{LiveOrders, MockOrders, OrderSource};
pub use types::{
    Envelope, NewProduct, NewUser, Order, OrderProduct, OrderUser, Product, ProductUpdate,
    Profile, ProfileUpdate, User, UserUpdate,
};

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::config::WmsApiConfig;
use crate::middleware::session::SessionToken;

/// Client for the warehouse management REST API.
///
/// Cheaply cloneable; all per-entity calls live in sibling modules as
/// `impl WmsClient` blocks. No request timeout is configured - stale search
/// requests are cancelled by the query cache instead of timed out.
#[derive(Clone)]
pub struct WmsClient {
    inner: Arc<WmsClientInner>,
}

struct WmsClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl WmsClient {
    /// Create a new API client from configuration.
    #[must_use]
    pub fn new(config: &WmsApiConfig) -> Self {
        Self {
            inner: Arc::new(WmsClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Probe the API for reachability (any HTTP answer counts).
    ///
    /// Used by the readiness endpoint; authentication is not required because
    /// a 401 still proves the API is up.
    ///
    /// # Errors
    ///
    /// Returns `WmsError::Http` if the API cannot be reached at all.
    pub async fn ping(&self) -> Result<(), WmsError> {
        self.inner
            .client
            .get(&self.inner.base_url)
            .send()
            .await
            .map(|_| ())
            .map_err(WmsError::from)
    }

    /// Send a request and map non-2xx statuses to `WmsError::Api`.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&SessionToken>,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, WmsError> {
        let mut request = self.inner.client.request(method, self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.header(reqwest::header::COOKIE, token.cookie_header());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Non-2xx is one uniform failure; keep the server's message when it
        // sends one so the UI can show it.
        let text = response.text().await.unwrap_or_default();
        Err(WmsError::Api {
            status,
            message: extract_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
        })
    }

    /// Send a request and unwrap the `{ "data": … }` envelope.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&SessionToken>,
        body: Option<&serde_json::Value>,
    ) -> Result<T, WmsError> {
        let response = self.send(method, path, query, token, body).await?;

        // Read the body as text first for better parse diagnostics.
        let text = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse WMS API response"
            );
            WmsError::Parse(e)
        })?;
        Ok(envelope.data)
    }

    /// Send a mutation and discard the response body.
    pub(crate) async fn mutate(
        &self,
        method: Method,
        path: &str,
        token: &SessionToken,
        body: Option<&serde_json::Value>,
    ) -> Result<(), WmsError> {
        self.send(method, path, &[], Some(token), body).await?;
        Ok(())
    }
}

/// Pull the `message` field out of an API error body.
///
/// The API reports validation failures as either a string or an array of
/// strings under `message`.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|m| m.as_str()).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_string() {
        assert_eq!(
            extract_message(r#"{"statusCode":401,"message":"Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
    }

    #[test]
    fn test_extract_message_array() {
        assert_eq!(
            extract_message(r#"{"message":["name must not be empty","stock must be positive"]}"#),
            Some("name must not be empty; stock must be positive".to_string())
        );
    }

    #[test]
    fn test_extract_message_absent_or_invalid() {
        assert_eq!(extract_message("not json"), None);
        assert_eq!(extract_message(r#"{"error":"Bad Request"}"#), None);
        assert_eq!(extract_message(r#"{"message":42}"#), None);
    }
}
