//! Cache key and value types for list queries.

use crate::wms::{Order, Product, User};

/// Entity family a query belongs to. Mutations invalidate an entire family.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Entity {
    Products,
    Users,
    Orders,
}

impl Entity {
    /// Stable name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Users => "users",
            Self::Orders => "orders",
        }
    }
}

/// Cache key: one entry per (entity, search-term) pair.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct QueryKey {
    pub entity: Entity,
    pub search: String,
}

impl QueryKey {
    #[must_use]
    pub fn new(entity: Entity, search: &str) -> Self {
        Self {
            entity,
            search: search.to_string(),
        }
    }
}

/// Cached value types, one variant per entity family.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Users(Vec<User>),
    Orders(Vec<Order>),
}

impl CacheValue {
    /// Unwrap a products result; `None` if the variant does not match the key
    /// family it was stored under.
    #[must_use]
    pub fn into_products(self) -> Option<Vec<Product>> {
        match self {
            Self::Products(products) => Some(products),
            _ => None,
        }
    }

    /// Unwrap a users result.
    #[must_use]
    pub fn into_users(self) -> Option<Vec<User>> {
        match self {
            Self::Users(users) => Some(users),
            _ => None,
        }
    }

    /// Unwrap an orders result.
    #[must_use]
    pub fn into_orders(self) -> Option<Vec<Order>> {
        match self {
            Self::Orders(orders) => Some(orders),
            _ => None,
        }
    }
}
