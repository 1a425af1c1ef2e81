//! Products table route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use stockdeck_core::{ProductId, StockStatus};

use crate::cache::{Entity, QueryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::session::{RequireSession, SessionToken};
use crate::state::AppState;
use crate::wms::{NewProduct, Product, ProductUpdate};

use super::dashboard::{NavView, nav_for};
use super::{fetch_products, format_date, redirect_with_error};

const PRODUCTS_PATH: &str = "/dashboard/products";

/// Search/flash query parameters for the table page.
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub error: String,
}

/// Product row view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub stock: i64,
    pub price: Decimal,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub created: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let status = product.status();
        let status_class = match status {
            StockStatus::InStock => "badge badge-green",
            StockStatus::LowStock => "badge badge-yellow",
            StockStatus::OutOfStock => "badge badge-red",
        };

        Self {
            id: product.id,
            name: product.name.clone(),
            stock: product.stock,
            price: product.price,
            status_label: status.label(),
            status_class,
            created: format_date(&product.created_at),
        }
    }
}

/// Products page template.
#[derive(Template)]
#[template(path = "dashboard/products.html")]
pub struct ProductsPageTemplate {
    pub nav: NavView,
    pub flash: String,
    pub search_query: String,
    pub products: Vec<ProductView>,
    pub error: String,
}

/// Table body fragment for live search.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products_rows.html")]
pub struct ProductsRowsTemplate {
    pub products: Vec<ProductView>,
    pub error: String,
}

/// Create/edit form fields. Stock and price arrive as raw text from number
/// inputs and are parsed at this boundary.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub price: String,
}

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/products", get(index).post(create))
        .route("/dashboard/products/rows", get(rows))
        .route("/dashboard/products/{id}", post(update))
        .route("/dashboard/products/{id}/stock", post(update_stock))
        .route("/dashboard/products/{id}/delete", post(delete))
}

/// Products table page.
///
/// GET /dashboard/products
#[instrument(skip(token, state, query))]
async fn index(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<Html<String>> {
    let nav = nav_for(&state, &token, PRODUCTS_PATH).await;

    let (products, error) = match fetch_products(&state, &token, &query.search).await {
        Ok(products) => (products.iter().map(ProductView::from).collect(), String::new()),
        Err(err) => (vec![], err.to_string()),
    };

    let template = ProductsPageTemplate {
        nav,
        flash: query.error,
        search_query: query.search,
        products,
        error,
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("template render: {e}")))?;
    Ok(Html(html))
}

/// Table body fragment for live search.
///
/// Keystrokes settle for the debounce window before any fetch is issued;
/// superseded terms answer 204 and the page keeps its current rows.
///
/// GET /dashboard/products/rows
#[instrument(skip(token, state, query))]
async fn rows(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Response {
    if !state.queries().debounce(Entity::Products).await {
        return StatusCode::NO_CONTENT.into_response();
    }

    match fetch_products(&state, &token, &query.search).await {
        Ok(products) => ProductsRowsTemplate {
            products: products.iter().map(ProductView::from).collect(),
            error: String::new(),
        }
        .into_response(),
        Err(QueryError::Superseded) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ProductsRowsTemplate {
            products: vec![],
            error: err.to_string(),
        }
        .into_response(),
    }
}

/// Create a product, invalidate the family, and re-render via redirect.
///
/// POST /dashboard/products
#[instrument(skip(token, state, form))]
async fn create(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Redirect {
    let product = match parse_form(&form) {
        Ok(product) => product,
        Err(message) => return redirect_with_error(PRODUCTS_PATH, &message),
    };

    match state.wms().create_product(&token, &product).await {
        Ok(()) => {
            state.queries().invalidate(Entity::Products);
            Redirect::to(PRODUCTS_PATH)
        }
        Err(err) => redirect_with_error(PRODUCTS_PATH, &err.to_string()),
    }
}

/// Update a product's name/price (the edit dialog carries the current stock
/// along, last writer wins).
///
/// POST /dashboard/products/{id}
#[instrument(skip(token, state, form), fields(product_id = %id))]
async fn update(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Redirect {
    apply_update(&state, &token, ProductId::new(id), &form).await
}

/// Update only the stock count (the dialog carries name/price along).
///
/// POST /dashboard/products/{id}/stock
#[instrument(skip(token, state, form), fields(product_id = %id))]
async fn update_stock(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Redirect {
    apply_update(&state, &token, ProductId::new(id), &form).await
}

/// Delete a product. Fire-and-forget: no confirmation step.
///
/// POST /dashboard/products/{id}/delete
#[instrument(skip(token, state), fields(product_id = %id))]
async fn delete(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Redirect {
    match state.wms().delete_product(&token, ProductId::new(id)).await {
        Ok(()) => {
            state.queries().invalidate(Entity::Products);
            Redirect::to(PRODUCTS_PATH)
        }
        Err(err) => redirect_with_error(PRODUCTS_PATH, &err.to_string()),
    }
}

async fn apply_update(
    state: &AppState,
    token: &SessionToken,
    id: ProductId,
    form: &ProductForm,
) -> Redirect {
    let parsed = match parse_form(form) {
        Ok(product) => product,
        Err(message) => return redirect_with_error(PRODUCTS_PATH, &message),
    };
    let update = ProductUpdate {
        name: parsed.name,
        stock: parsed.stock,
        price: parsed.price,
    };

    match state.wms().update_product(token, id, &update).await {
        Ok(()) => {
            state.queries().invalidate(Entity::Products);
            Redirect::to(PRODUCTS_PATH)
        }
        Err(err) => redirect_with_error(PRODUCTS_PATH, &err.to_string()),
    }
}

/// Parse the raw form fields into an API payload.
fn parse_form(form: &ProductForm) -> std::result::Result<NewProduct, String> {
    let stock = form
        .stock
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid stock value: {}", form.stock))?;
    let price = form
        .price
        .trim()
        .parse::<Decimal>()
        .map_err(|_| format!("Invalid price value: {}", form.price))?;

    Ok(NewProduct {
        name: form.name.clone(),
        stock,
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    fn product(stock: i64) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Pallet Jack".to_string(),
            stock,
            price: Decimal::new(24999, 2),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_view_badge_out_of_stock_at_zero() {
        let view = ProductView::from(&product(0));
        assert_eq!(view.status_label, "Out of Stock");
        assert_eq!(view.status_class, "badge badge-red");
    }

    #[test]
    fn test_view_badge_low_stock_through_ten() {
        let view = ProductView::from(&product(10));
        assert_eq!(view.status_label, "Low Stock");
        assert_eq!(view.status_class, "badge badge-yellow");
    }

    #[test]
    fn test_view_badge_in_stock_above_ten() {
        let view = ProductView::from(&product(11));
        assert_eq!(view.status_label, "In Stock");
        assert_eq!(view.status_class, "badge badge-green");
    }

    #[test]
    fn test_parse_form_accepts_decimal_price() {
        let form = ProductForm {
            name: "Shrink Wrap".to_string(),
            stock: "5".to_string(),
            price: "8.50".to_string(),
        };
        let parsed = parse_form(&form).expect("valid form");
        assert_eq!(parsed.stock, 5);
        assert_eq!(parsed.price, Decimal::new(850, 2));
    }

    #[test]
    fn test_parse_form_rejects_bad_numbers() {
        let form = ProductForm {
            name: "Shrink Wrap".to_string(),
            stock: "lots".to_string(),
            price: "8.50".to_string(),
        };
        assert!(parse_form(&form).is_err());

        let form = ProductForm {
            name: "Shrink Wrap".to_string(),
            stock: "5".to_string(),
            price: "cheap".to_string(),
        };
        assert!(parse_form(&form).is_err());
    }
}
