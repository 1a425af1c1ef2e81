//! Product catalog calls.

use reqwest::Method;
use tracing::instrument;

use stockdeck_core::ProductId;

use super::{NewProduct, Product, ProductUpdate, WmsClient, WmsError};
use crate::middleware::session::SessionToken;

impl WmsClient {
    /// List products, optionally filtered by a substring search term.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` on transport failure or a non-2xx response.
    #[instrument(skip(self, token), fields(search = %search))]
    pub async fn list_products(
        &self,
        token: &SessionToken,
        search: &str,
    ) -> Result<Vec<Product>, WmsError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if !search.is_empty() {
            query.push(("search", search));
        }
        self.fetch(Method::GET, "/product", &query, Some(token), None)
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` if the API rejects the payload.
    #[instrument(skip(self, token, product), fields(name = %product.name))]
    pub async fn create_product(
        &self,
        token: &SessionToken,
        product: &NewProduct,
    ) -> Result<(), WmsError> {
        let body = serde_json::to_value(product)?;
        self.mutate(Method::POST, "/product", token, Some(&body)).await
    }

    /// Update a product (edit and update-stock both land here).
    ///
    /// # Errors
    ///
    /// Returns `WmsError` if the API rejects the update.
    #[instrument(skip(self, token, update), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &SessionToken,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<(), WmsError> {
        let body = serde_json::to_value(update)?;
        self.mutate(Method::PUT, &format!("/product/{id}"), token, Some(&body))
            .await
    }

    /// Delete a product. Fire-and-forget from the row menu; there is no
    /// confirmation step.
    ///
    /// # Errors
    ///
    /// Returns `WmsError` if the API rejects the delete.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        token: &SessionToken,
        id: ProductId,
    ) -> Result<(), WmsError> {
        self.mutate(Method::DELETE, &format!("/product/{id}"), token, None)
            .await
    }
}
