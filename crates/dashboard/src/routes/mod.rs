//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (probes the WMS API)
//!
//! # Auth
//! GET  /login                         - Login page
//! POST /login                         - Authenticate against the WMS API
//! GET  /register                      - Registration page
//! POST /register                      - Create account
//! POST /logout                        - End session, clear cookie
//! POST /dashboard/profile             - Update own username/password
//!
//! # Dashboard (session cookie required)
//! GET  /                              - Redirect to /dashboard
//! GET  /dashboard                     - Overview with metric cards
//!
//! # Products
//! GET  /dashboard/products            - Products table
//! GET  /dashboard/products/rows       - Table body fragment (debounced search)
//! POST /dashboard/products            - Create product
//! POST /dashboard/products/{id}       - Update product (name/price)
//! POST /dashboard/products/{id}/stock - Update stock only
//! POST /dashboard/products/{id}/delete - Delete product
//!
//! # Users
//! GET  /dashboard/users               - Users table
//! GET  /dashboard/users/rows          - Table body fragment (debounced search)
//! POST /dashboard/users               - Create user
//! POST /dashboard/users/{id}          - Update user (username/role)
//! POST /dashboard/users/{id}/password - Change password
//! POST /dashboard/users/{id}/delete   - Delete user
//!
//! # Orders
//! GET  /dashboard/orders              - Orders table (mock or live source)
//! GET  /dashboard/orders/rows         - Table body fragment (debounced search)
//! ```

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use axum::{Router, response::Redirect};
use chrono::{DateTime, Utc};

use crate::cache::{CacheValue, Entity, QueryError};
use crate::middleware::session::SessionToken;
use crate::state::AppState;
use crate::wms::{Order, Product, User};

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(products::router())
        .merge(users::router())
        .merge(orders::router())
}

/// Format a timestamp the way the tables display it.
pub(crate) fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %d, %Y").to_string()
}

/// Redirect back to `path` with an error message in the query string, shown
/// as a blocking alert banner on the next render.
pub(crate) fn redirect_with_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// List products for `(search)` through the query cache.
pub(crate) async fn fetch_products(
    state: &AppState,
    token: &SessionToken,
    search: &str,
) -> Result<Vec<Product>, QueryError> {
    let wms = state.wms().clone();
    let token = token.clone();
    let term = search.to_string();
    state
        .queries()
        .get_or_fetch(Entity::Products, search, move || async move {
            wms.list_products(&token, &term).await.map(CacheValue::Products)
        })
        .await
        .map(|value| value.into_products().unwrap_or_default())
}

/// List users for `(search)` through the query cache, sorted by ascending ID.
pub(crate) async fn fetch_users(
    state: &AppState,
    token: &SessionToken,
    search: &str,
) -> Result<Vec<User>, QueryError> {
    let wms = state.wms().clone();
    let token = token.clone();
    let term = search.to_string();
    state
        .queries()
        .get_or_fetch(Entity::Users, search, move || async move {
            wms.list_users(&token, &term).await.map(CacheValue::Users)
        })
        .await
        .map(|value| {
            let mut users = value.into_users().unwrap_or_default();
            users.sort_by_key(|user| user.id);
            users
        })
}

/// List orders for `(search)` through the query cache, using the configured
/// source (mock fixture rows or the live `/order` endpoints).
pub(crate) async fn fetch_orders(
    state: &AppState,
    token: &SessionToken,
    search: &str,
) -> Result<Vec<Order>, QueryError> {
    let source = state.orders();
    let token = token.clone();
    let term = search.to_string();
    state
        .queries()
        .get_or_fetch(Entity::Orders, search, move || async move {
            source.list(&token, &term).await.map(CacheValue::Orders)
        })
        .await
        .map(|value| value.into_orders().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let timestamp = DateTime::parse_from_rfc3339("2023-06-15T10:30:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        assert_eq!(format_date(&timestamp), "Jun 15, 2023");
    }
}
