//! Orders table route handlers.
//!
//! Rows come from whichever `OrderSource` is configured; the handlers and the
//! cache treat mock and live sources identically. Row actions are
//! display-only affordances.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use stockdeck_core::OrderId;

use crate::cache::{Entity, QueryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::session::RequireSession;
use crate::state::AppState;
use crate::wms::Order;

use super::dashboard::{NavView, nav_for};
use super::products::TableQuery;
use super::{fetch_orders, format_date};

const ORDERS_PATH: &str = "/dashboard/orders";

/// Order row view for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: OrderId,
    pub product_name: String,
    pub username: String,
    pub quantity: i64,
    pub created: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            product_name: order.product.name.clone(),
            username: order.user.username.clone(),
            quantity: order.quantity,
            created: format_date(&order.created_at),
        }
    }
}

/// Orders page template.
#[derive(Template)]
#[template(path = "dashboard/orders.html")]
pub struct OrdersPageTemplate {
    pub nav: NavView,
    pub flash: String,
    pub search_query: String,
    pub orders: Vec<OrderView>,
    pub error: String,
}

/// Table body fragment for live search.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/orders_rows.html")]
pub struct OrdersRowsTemplate {
    pub orders: Vec<OrderView>,
    pub error: String,
}

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/orders", get(index))
        .route("/dashboard/orders/rows", get(rows))
}

/// Orders table page.
///
/// GET /dashboard/orders
#[instrument(skip(token, state, query))]
async fn index(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<Html<String>> {
    let nav = nav_for(&state, &token, ORDERS_PATH).await;

    let (orders, error) = match fetch_orders(&state, &token, &query.search).await {
        Ok(orders) => (orders.iter().map(OrderView::from).collect(), String::new()),
        Err(err) => (vec![], err.to_string()),
    };

    let template = OrdersPageTemplate {
        nav,
        flash: query.error,
        search_query: query.search,
        orders,
        error,
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("template render: {e}")))?;
    Ok(Html(html))
}

/// Table body fragment for live search.
///
/// GET /dashboard/orders/rows
#[instrument(skip(token, state, query))]
async fn rows(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Response {
    if !state.queries().debounce(Entity::Orders).await {
        return StatusCode::NO_CONTENT.into_response();
    }

    match fetch_orders(&state, &token, &query.search).await {
        Ok(orders) => OrdersRowsTemplate {
            orders: orders.iter().map(OrderView::from).collect(),
            error: String::new(),
        }
        .into_response(),
        Err(QueryError::Superseded) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => OrdersRowsTemplate {
            orders: vec![],
            error: err.to_string(),
        }
        .into_response(),
    }
}
