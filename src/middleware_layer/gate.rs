use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    handlers::auth::SESSION_COOKIE,
    services::session::SessionAuthority,
    state::AppState,
};

/// Where unauthenticated page requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// Path prefixes that never require a session.
const EXEMPT_PREFIXES: [&str; 3] = ["/api/", "/_next/", "/favicon.ico"];

/// The outcome of evaluating a request against the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
}

/// Returns `true` if `path` is reachable without a session.
pub fn is_exempt(path: &str) -> bool {
    path == LOGIN_PATH || EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Decides whether a request may proceed.
///
/// # Arguments
///
/// * `path` - The request path.
/// * `cookie` - The session cookie value, if any.
/// * `sessions` - The authority that validates the cookie.
/// * `protection_enabled` - Whether the gate is switched on.
pub fn evaluate(
    path: &str,
    cookie: Option<&str>,
    sessions: &SessionAuthority,
    protection_enabled: bool,
) -> GateDecision {
    if !protection_enabled || is_exempt(path) {
        return GateDecision::Allow;
    }

    match cookie {
        Some(token) if sessions.is_valid(token) => GateDecision::Allow,
        _ => GateDecision::RedirectToLogin,
    }
}

/// A middleware that redirects requests without a valid session to the login page.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The downstream `Response`, or a redirect to `/login`.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request<Body>,
    next: Next,
) -> Response {
    let cookie = cookies.get(SESSION_COOKIE);
    let decision = evaluate(
        request.uri().path(),
        cookie.as_ref().map(|c| c.value()),
        &state.sessions,
        state.config.password_protection,
    );

    match decision {
        GateDecision::Allow => next.run(request).await,
        GateDecision::RedirectToLogin => {
            tracing::debug!(
                "🔒 No valid session for {}, redirecting to login",
                request.uri().path()
            );
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}
