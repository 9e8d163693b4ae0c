use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;

use crate::{
    crypto::signing::constant_time_eq,
    error::{AppError, Result},
    models::session::THIRTY_DAYS_MS,
    state::AppState,
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "app-auth";

/// The message returned for any unusable login body.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request";

/// The request payload for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
}

/// Creates the session cookie.
fn create_session_cookie(value: String, production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);

    cookie.set_http_only(true);
    if production {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::milliseconds(THIRTY_DAYS_MS));
    cookie.set_path("/");

    cookie
}

/// Compares two passwords in constant time.
///
/// Both sides are hashed first so the comparison never depends on the
/// configured password's length.
fn passwords_match(supplied: &str, expected: &str) -> bool {
    let supplied = Sha256::digest(supplied.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    constant_time_eq(&supplied, &expected)
}

/// Handles login with the shared password.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    body: Bytes,
) -> Result<Response> {
    tracing::debug!("🔐 Login attempt");

    let payload: LoginRequest = sonic_rs::from_slice(&body)
        .map_err(|_| AppError::MalformedRequest(INVALID_REQUEST_MESSAGE.to_string()))?;

    if !passwords_match(&payload.password, &state.config.app_password) {
        return Err(AppError::Authentication("Invalid password".to_string()));
    }

    let token = state.sessions.issue_token();
    cookies.add(create_session_cookie(token, state.config.production));

    tracing::info!("✅ Login successful, session cookie issued");

    Ok((StatusCode::OK, Json(AuthResponse { success: true })).into_response())
}

/// Handles logout by clearing the session cookie.
#[axum::debug_handler]
pub async fn logout(cookies: Cookies) -> Result<Response> {
    let mut session_cookie = Cookie::new(SESSION_COOKIE, "");
    session_cookie.set_max_age(Duration::seconds(0));
    session_cookie.set_path("/");
    cookies.remove(session_cookie);

    tracing::info!("👋 Session cookie cleared");

    Ok((StatusCode::OK, Json(AuthResponse { success: true })).into_response())
}
