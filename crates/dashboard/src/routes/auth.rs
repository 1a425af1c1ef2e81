//! Authentication route handlers.
//!
//! The dashboard never checks credentials itself: login and registration
//! forward to the WMS API, and the session cookie the API issues is re-issued
//! to the browser. Failures surface the server's message; empty submissions
//! pass through to the server unchanged.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::header,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use stockdeck_core::Role;

use crate::middleware::session::{RequireSession, removal_cookie, session_cookie};
use crate::state::AppState;
use crate::wms::ProfileUpdate;

use super::redirect_with_error;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    error: String,
    notice: String,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
struct RegisterPageTemplate {
    error: String,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
struct LoginQuery {
    #[serde(default)]
    error: String,
    registered: Option<String>,
}

/// Query parameters for the registration page.
#[derive(Debug, Deserialize)]
struct RegisterQuery {
    #[serde(default)]
    error: String,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Registration form fields. The role defaults to Staff.
#[derive(Debug, Deserialize)]
struct RegisterForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Profile dialog form fields.
#[derive(Debug, Deserialize)]
struct ProfileForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", post(logout))
        .route("/dashboard/profile", post(update_profile))
}

/// Render the login page.
///
/// GET /login
async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginPageTemplate {
        error: query.error,
        notice: if query.registered.is_some() {
            "Account created successfully. Please log in.".to_string()
        } else {
            String::new()
        },
    }
}

/// Authenticate and set the session cookie.
///
/// POST /login
#[instrument(skip(state, form))]
async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let password = SecretString::from(form.password);
    match state.wms().login(&form.username, &password).await {
        Ok(token) => {
            tracing::info!(username = %form.username, "login succeeded");
            (
                AppendHeaders([(header::SET_COOKIE, session_cookie(&token).to_string())]),
                Redirect::to("/dashboard"),
            )
                .into_response()
        }
        Err(err) => {
            tracing::info!(username = %form.username, error = %err, "login failed");
            redirect_with_error("/login", &err.to_string()).into_response()
        }
    }
}

/// Render the registration page.
///
/// GET /register
async fn register_page(Query(query): Query<RegisterQuery>) -> impl IntoResponse {
    RegisterPageTemplate { error: query.error }
}

/// Create an account, then send the user to the login page.
///
/// POST /register
#[instrument(skip(state, form))]
async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Redirect {
    let password = SecretString::from(form.password);
    match state
        .wms()
        .signup(&form.username, &password, Role::Staff)
        .await
    {
        Ok(()) => Redirect::to("/login?registered=1"),
        Err(err) => {
            tracing::info!(username = %form.username, error = %err, "registration failed");
            redirect_with_error("/register", &err.to_string())
        }
    }
}

/// End the session and clear the cookie.
///
/// POST /logout
#[instrument(skip(token, state))]
async fn logout(RequireSession(token): RequireSession, State(state): State<AppState>) -> Response {
    // Best effort: the browser cookie is cleared even if the API call fails.
    if let Err(err) = state.wms().logout(&token).await {
        tracing::warn!(error = %err, "logout call to WMS API failed");
    }

    (
        AppendHeaders([(header::SET_COOKIE, removal_cookie().to_string())]),
        Redirect::to("/login"),
    )
        .into_response()
}

/// Update the current user's own profile.
///
/// POST /dashboard/profile
#[instrument(skip(token, state, form))]
async fn update_profile(
    RequireSession(token): RequireSession,
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Redirect {
    let profile = match state.wms().profile(&token).await {
        Ok(profile) => profile,
        Err(err) => return redirect_with_error("/dashboard", &err.to_string()),
    };

    let update = ProfileUpdate {
        username: form.username,
        password: if form.password.is_empty() {
            None
        } else {
            Some(form.password)
        },
    };

    match state.wms().update_profile(&token, profile.id, &update).await {
        Ok(()) => Redirect::to("/dashboard"),
        Err(err) => redirect_with_error("/dashboard", &err.to_string()),
    }
}
