//! Integration tests for the Stockdeck dashboard.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the WMS API (external) and the dashboard
//! cargo run -p stockdeck-dashboard
//!
//! # Run integration tests
//! cargo test -p stockdeck-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running dashboard
//! (and, for the authenticated flows, a running WMS API with a known test
//! account).

use reqwest::Client;

/// Base URL for the dashboard (configurable via environment).
#[must_use]
pub fn dashboard_base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Username/password of the seeded test account, if any.
#[must_use]
pub fn test_credentials() -> (String, String) {
    (
        std::env::var("DASHBOARD_TEST_USERNAME").unwrap_or_else(|_| "admin".to_string()),
        std::env::var("DASHBOARD_TEST_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
    )
}

/// Client with a cookie store, following redirects (browser-like).
#[must_use]
pub fn browser_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Client with a cookie store that does NOT follow redirects, for asserting
/// on Location headers.
#[must_use]
pub fn raw_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Log in through the dashboard form and return a cookie-carrying client.
///
/// # Panics
///
/// Panics if the login request cannot be sent.
pub async fn logged_in_client() -> Client {
    let client = browser_client();
    let (username, password) = test_credentials();
    let base_url = dashboard_base_url();

    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[("username", username.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to send login request");
    assert!(
        resp.status().is_success(),
        "login failed with status {}",
        resp.status()
    );

    client
}
