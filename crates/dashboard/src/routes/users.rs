//! Users table route handlers.
//!
//! The Users tab is hidden from non-admin profiles, but that is display
//! gating only - the page itself renders for anyone with a session and lets
//! the API's 403 surface as the table's error state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use stockdeck_core::{Role, UserId};

use crate::cache::{Entity, QueryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::session::{RequireSession, SessionToken};
use crate::state::AppState;
use crate::wms::{NewUser, User, UserUpdate};

use super::dashboard::{NavView, nav_for};
use super::products::TableQuery;
use super::{fetch_users, format_date, redirect_with_error};

const USERS_PATH: &str = "/dashboard/users";

/// User row view for templates.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub role_label: &'static str,
    pub is_admin: bool,
    pub role_code: &'static str,
    pub created: String,
    pub updated: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role_label: user.role.label(),
            is_admin: user.role.is_admin(),
            role_code: user.role.code(),
            created: format_date(&user.created_at),
            updated: format_date(&user.updated_at),
        }
    }
}

/// Users page template.
#[derive(Template)]
#[template(path = "dashboard/users.html")]
pub struct UsersPageTemplate {
    pub nav: NavView,
    pub flash: String,
    pub search_query: String,
    pub users: Vec<UserView>,
    pub error: String,
}

/// Table body fragment for live search.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/users_rows.html")]
pub struct UsersRowsTemplate {
    pub users: Vec<UserView>,
    pub error: String,
}

/// Create/edit form fields. The role arrives as its wire code from the
/// select element; unknown codes fall back to Staff.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/users", get(index).post(create))
        .route("/dashboard/users/rows", get(rows))
        .route("/dashboard/users/{id}", post(update))
        .route("/dashboard/users/{id}/password", post(change_password))
        .route("/dashboard/users/{id}/delete", post(delete))
}

/// Users table page.
///
/// GET /dashboard/users
#[instrument(skip(token, state, query))]
async fn index(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<Html<String>> {
    let nav = nav_for(&state, &token, USERS_PATH).await;

    let (users, error) = match fetch_users(&state, &token, &query.search).await {
        Ok(users) => (users.iter().map(UserView::from).collect(), String::new()),
        Err(err) => (vec![], err.to_string()),
    };

    let template = UsersPageTemplate {
        nav,
        flash: query.error,
        search_query: query.search,
        users,
        error,
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("template render: {e}")))?;
    Ok(Html(html))
}

/// Table body fragment for live search.
///
/// GET /dashboard/users/rows
#[instrument(skip(token, state, query))]
async fn rows(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Response {
    if !state.queries().debounce(Entity::Users).await {
        return StatusCode::NO_CONTENT.into_response();
    }

    match fetch_users(&state, &token, &query.search).await {
        Ok(users) => UsersRowsTemplate {
            users: users.iter().map(UserView::from).collect(),
            error: String::new(),
        }
        .into_response(),
        Err(QueryError::Superseded) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => UsersRowsTemplate {
            users: vec![],
            error: err.to_string(),
        }
        .into_response(),
    }
}

/// Create a user account.
///
/// POST /dashboard/users
#[instrument(skip(token, state, form))]
async fn create(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Redirect {
    let user = NewUser {
        username: form.username,
        password: form.password,
        role: Role::from_code(&form.role),
    };

    match state.wms().create_user(&token, &user).await {
        Ok(()) => {
            state.queries().invalidate(Entity::Users);
            Redirect::to(USERS_PATH)
        }
        Err(err) => redirect_with_error(USERS_PATH, &err.to_string()),
    }
}

/// Update a user's username/role.
///
/// POST /dashboard/users/{id}
#[instrument(skip(token, state, form), fields(user_id = %id))]
async fn update(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Redirect {
    apply_update(&state, &token, UserId::new(id), &form).await
}

/// Change a user's password (write-only; the dialog carries username/role
/// along unchanged).
///
/// POST /dashboard/users/{id}/password
#[instrument(skip(token, state, form), fields(user_id = %id))]
async fn change_password(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Redirect {
    apply_update(&state, &token, UserId::new(id), &form).await
}

/// Delete a user. Fire-and-forget: no confirmation step.
///
/// POST /dashboard/users/{id}/delete
#[instrument(skip(token, state), fields(user_id = %id))]
async fn delete(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Redirect {
    match state.wms().delete_user(&token, UserId::new(id)).await {
        Ok(()) => {
            state.queries().invalidate(Entity::Users);
            Redirect::to(USERS_PATH)
        }
        Err(err) => redirect_with_error(USERS_PATH, &err.to_string()),
    }
}

async fn apply_update(state: &AppState, token: &SessionToken, id: UserId, form: &UserForm) -> Redirect {
    let update = UserUpdate {
        username: form.username.clone(),
        role: Role::from_code(&form.role),
        password: if form.password.is_empty() {
            None
        } else {
            Some(form.password.clone())
        },
    };

    match state.wms().update_user(token, id, &update).await {
        Ok(()) => {
            state.queries().invalidate(Entity::Users);
            Redirect::to(USERS_PATH)
        }
        Err(err) => redirect_with_error(USERS_PATH, &err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            id: UserId::new(1),
            username: "dispatch".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_badge() {
        let view = UserView::from(&user(Role::Admin));
        assert_eq!(view.role_label, "Admin");
        assert!(view.is_admin);
        assert_eq!(view.role_code, "1");
    }

    #[test]
    fn test_staff_badge() {
        let view = UserView::from(&user(Role::Staff));
        assert_eq!(view.role_label, "Staff");
        assert!(!view.is_admin);
        assert_eq!(view.role_code, "2");
    }
}
