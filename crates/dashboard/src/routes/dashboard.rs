//! Dashboard overview route handlers.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use crate::capabilities::{can_view_active_users, can_view_users};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::session::{RequireSession, SessionToken};
use crate::state::AppState;
use crate::wms::Profile;

use super::{fetch_products, fetch_users};

/// Navigation and profile-menu context rendered on every page.
#[derive(Debug, Clone)]
pub struct NavView {
    pub username: String,
    pub role_label: String,
    pub show_users_tab: bool,
    /// The profile fetch failed; the menu shows a failure note but the page
    /// stays interactive.
    pub load_failed: bool,
    pub current_path: String,
}

impl NavView {
    pub(crate) fn from_profile(profile: &Profile, current_path: &str) -> Self {
        Self {
            username: profile.username.clone(),
            role_label: profile.role.label_lower().to_string(),
            show_users_tab: can_view_users(profile),
            load_failed: false,
            current_path: current_path.to_string(),
        }
    }

    pub(crate) fn fallback(current_path: &str) -> Self {
        Self {
            username: "User".to_string(),
            role_label: String::new(),
            show_users_tab: false,
            load_failed: true,
            current_path: current_path.to_string(),
        }
    }
}

/// Fetch the current profile and build the navigation context, falling back
/// to an anonymous shell when the profile call fails.
pub(crate) async fn nav_for(state: &AppState, token: &SessionToken, current_path: &str) -> NavView {
    match state.wms().profile(token).await {
        Ok(profile) => NavView::from_profile(&profile, current_path),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load profile for navigation");
            NavView::fallback(current_path)
        }
    }
}

/// Flash query parameters shared by redirect targets.
#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    #[serde(default)]
    pub error: String,
}

/// Overview page template.
#[derive(Template)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub nav: NavView,
    pub flash: String,
    pub total_products: String,
    pub active_users: String,
    pub show_active_users: bool,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/dashboard", get(overview))
}

/// Redirect the bare root to the dashboard.
async fn root() -> Redirect {
    Redirect::to("/dashboard")
}

/// Overview page: metric cards plus the tab shell.
///
/// GET /dashboard
#[instrument(skip(token, state, query))]
async fn overview(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<Html<String>> {
    // Profile and product count load concurrently; the user count only
    // matters for admins, so it waits for the profile.
    let (profile_result, products_result) = tokio::join!(
        state.wms().profile(&token),
        fetch_products(&state, &token, "")
    );

    let profile = match profile_result {
        Ok(profile) => Some(profile),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load profile for overview");
            None
        }
    };

    let nav = profile.as_ref().map_or_else(
        || NavView::fallback("/dashboard"),
        |p| NavView::from_profile(p, "/dashboard"),
    );

    let total_products = match products_result {
        Ok(products) => products.len().to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load product count");
            "-".to_string()
        }
    };

    let show_active_users = profile.as_ref().is_some_and(can_view_active_users);
    let active_users = if show_active_users {
        match fetch_users(&state, &token, "").await {
            Ok(users) => users.len().to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load user count");
                "-".to_string()
            }
        }
    } else {
        String::new()
    };

    let template = DashboardTemplate {
        nav,
        flash: query.error,
        total_products,
        active_users,
        show_active_users,
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("template render: {e}")))?;
    Ok(Html(html))
}
