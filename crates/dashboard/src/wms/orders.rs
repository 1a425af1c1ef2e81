//! Order listing behind a swappable source.
//!
//! The orders table can run against static placeholder rows or the live
//! `/order` endpoints; both sit behind `OrderSource` so the table code and
//! the query cache treat them identically. The source is chosen by
//! `DASHBOARD_ORDERS_SOURCE` (mock is the default).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use tracing::instrument;

use stockdeck_core::{OrderId, ProductId, UserId};

use super::{Order, OrderProduct, OrderUser, WmsClient, WmsError};
use crate::middleware::session::SessionToken;

/// Source of order rows for the orders table.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// List orders matching a substring search on product name or username.
    async fn list(&self, token: &SessionToken, search: &str) -> Result<Vec<Order>, WmsError>;
}

/// Live order source backed by the `/order` endpoints.
pub struct LiveOrders {
    client: WmsClient,
}

impl LiveOrders {
    #[must_use]
    pub const fn new(client: WmsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderSource for LiveOrders {
    #[instrument(skip(self, token), fields(search = %search))]
    async fn list(&self, token: &SessionToken, search: &str) -> Result<Vec<Order>, WmsError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if !search.is_empty() {
            query.push(("search", search));
        }
        self.client
            .fetch(Method::GET, "/order", &query, Some(token), None)
            .await
    }
}

/// Placeholder order source serving a fixed set of rows.
pub struct MockOrders {
    rows: Vec<Order>,
}

impl MockOrders {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: fixture_rows(),
        }
    }
}

impl Default for MockOrders {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderSource for MockOrders {
    async fn list(&self, _token: &SessionToken, search: &str) -> Result<Vec<Order>, WmsError> {
        let needle = search.to_lowercase();
        Ok(self
            .rows
            .iter()
            .filter(|order| {
                order.product.name.to_lowercase().contains(&needle)
                    || order.user.username.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}

fn fixture_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid fixture timestamp")
        .with_timezone(&Utc)
}

fn fixture_order(
    id: i64,
    product_id: i64,
    product_name: &str,
    user_id: i64,
    username: &str,
    quantity: i64,
    created_at: &str,
) -> Order {
    Order {
        id: OrderId::new(id),
        product: OrderProduct {
            id: ProductId::new(product_id),
            name: product_name.to_string(),
        },
        user: OrderUser {
            id: UserId::new(user_id),
            username: username.to_string(),
        },
        quantity,
        created_at: fixture_timestamp(created_at),
    }
}

fn fixture_rows() -> Vec<Order> {
    vec![
        fixture_order(1, 1, "Product A", 1, "user1", 2, "2023-06-15T10:30:00Z"),
        fixture_order(2, 2, "Product B", 2, "user2", 1, "2023-06-20T14:45:00Z"),
        fixture_order(3, 3, "Product C", 1, "user1", 3, "2023-06-25T09:15:00Z"),
        fixture_order(4, 4, "Product D", 3, "user3", 2, "2023-06-30T16:20:00Z"),
        fixture_order(5, 5, "Product E", 2, "user2", 1, "2023-07-05T11:10:00Z"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SessionToken {
        SessionToken::new("test-token")
    }

    #[tokio::test]
    async fn test_mock_orders_list_all_without_search() {
        let source = MockOrders::new();
        let orders = source.list(&token(), "").await.expect("list orders");
        assert_eq!(orders.len(), 5);
    }

    #[tokio::test]
    async fn test_mock_orders_filter_by_product_name() {
        let source = MockOrders::new();
        let orders = source.list(&token(), "product b").await.expect("list orders");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, OrderId::new(2));
    }

    #[tokio::test]
    async fn test_mock_orders_filter_by_username() {
        let source = MockOrders::new();
        let orders = source.list(&token(), "user1").await.expect("list orders");
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.user.username == "user1"));
    }

    #[tokio::test]
    async fn test_mock_orders_no_match() {
        let source = MockOrders::new();
        let orders = source.list(&token(), "forklift").await.expect("list orders");
        assert!(orders.is_empty());
    }
}
