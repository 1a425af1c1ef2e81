//! Wire types for the warehouse management API.
//!
//! Shapes mirror the API's JSON responses (camelCase field names, `{ "data": … }`
//! envelope). The server is the source of truth; the dashboard only holds these
//! for the lifetime of a cached query.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockdeck_core::{OrderId, ProductId, Role, StockStatus, UserId};

/// Envelope wrapping every successful API response body.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// A product as returned by `GET /product`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Units on hand; drives the derived status badge.
    pub stock: i64,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Derived stock status from the fixed thresholds.
    #[must_use]
    pub const fn status(&self) -> StockStatus {
        StockStatus::from_units(self.stock)
    }
}

/// A user as returned by `GET /user`. Passwords are write-only and never
/// appear in responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product reference embedded in an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderProduct {
    pub id: ProductId,
    pub name: String,
}

/// User reference embedded in an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUser {
    pub id: UserId,
    pub username: String,
}

/// An order as returned by `GET /order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub product: OrderProduct,
    pub user: OrderUser,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// The current user, from `GET /auth/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

/// Body for `PUT /auth/profile/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    /// Omitted entirely when the user leaves the password field blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body for `POST /product`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub stock: i64,
    pub price: Decimal,
}

/// Body for `PUT /product/{id}`.
///
/// The edit and update-stock dialogs both submit the full row state; the last
/// writer wins (concurrent edits are not detected).
#[derive(Debug, Clone, Serialize)]
pub struct ProductUpdate {
    pub name: String,
    pub stock: i64,
    pub price: Decimal,
}

/// Body for `POST /user`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Body for `PUT /user/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub username: String,
    pub role: Role,
    /// Only sent by the change-password dialog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_list_envelope_decodes() {
        let body = r#"{
            "data": [
                { "id": 1, "name": "Pallet Jack", "stock": 12, "price": "249.99", "createdAt": "2023-06-15T10:30:00Z" },
                { "id": 2, "name": "Shrink Wrap", "stock": 0, "price": 8.5, "createdAt": "2023-06-20T14:45:00Z" }
            ]
        }"#;
        let envelope: Envelope<Vec<Product>> = serde_json::from_str(body).expect("decode products");
        assert_eq!(envelope.data.len(), 2);
        let jack = &envelope.data[0];
        assert_eq!(jack.id, ProductId::new(1));
        assert_eq!(jack.status(), StockStatus::InStock);
        let wrap = &envelope.data[1];
        assert_eq!(wrap.status(), StockStatus::OutOfStock);
    }

    #[test]
    fn test_user_decodes_role_code() {
        let body = r#"{
            "data": [
                { "id": 3, "username": "dispatch", "role": "2",
                  "createdAt": "2023-06-15T10:30:00Z", "updatedAt": "2023-06-16T09:00:00Z" }
            ]
        }"#;
        let envelope: Envelope<Vec<User>> = serde_json::from_str(body).expect("decode users");
        assert_eq!(envelope.data[0].role, Role::Staff);
    }

    #[test]
    fn test_order_decodes_nested_references() {
        let body = r#"{
            "id": 1,
            "product": { "id": 4, "name": "Strapping Kit" },
            "user": { "id": 2, "username": "picker1" },
            "quantity": 3,
            "createdAt": "2023-07-05T11:10:00Z"
        }"#;
        let order: Order = serde_json::from_str(body).expect("decode order");
        assert_eq!(order.product.name, "Strapping Kit");
        assert_eq!(order.user.username, "picker1");
        assert_eq!(order.quantity, 3);
    }

    #[test]
    fn test_profile_update_omits_blank_password() {
        let update = ProfileUpdate {
            username: "lead".to_string(),
            password: None,
        };
        let json = serde_json::to_value(&update).expect("serialize update");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_user_update_serializes_role_code() {
        let update = UserUpdate {
            username: "lead".to_string(),
            role: Role::Admin,
            password: None,
        };
        let json = serde_json::to_value(&update).expect("serialize update");
        assert_eq!(json["role"], "1");
    }
}
