//! Authentication gate and Orb webhook receiver for the billing dashboard.
//!
//! Pages sit behind a stateless signed-cookie session; Orb deliveries are
//! checked against a timestamp-bound HMAC before they are acknowledged.

use axum::{
    Router,
    routing::{get, post},
    middleware::from_fn_with_state,
    extract::DefaultBodyLimit,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod state;
pub mod crypto {
    pub mod signing;
}

pub mod models {
    pub mod session;
    pub mod webhook;
}

pub mod services {
    pub mod session;
    pub mod webhook;
}

pub mod handlers {
    pub mod auth;
    pub mod health;
    pub mod webhooks;
}

pub mod middleware_layer {
    pub mod gate;
}

use state::AppState;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the application router.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/webhooks/orb", post(handlers::webhooks::orb_webhook))
        .route("/api/health", get(handlers::health::health))
        .route_service(
            middleware_layer::gate::LOGIN_PATH,
            ServeFile::new(format!("{}/login.html", static_dir)),
        )
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::gate::require_session,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
