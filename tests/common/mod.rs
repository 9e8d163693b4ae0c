#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use orb_gate::{app, config::Config, state::AppState};

pub const PASSWORD: &str = "correct-horse-battery";
pub const WEBHOOK_SECRET: &str = "whsec_integration";

// Shared test context
pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::new(PASSWORD, Some(WEBHOOK_SECRET)))
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            app: app(AppState::new(config)),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn login(&self, password: &str) -> Response<Body> {
        let body = serde_json::json!({ "password": password }).to_string();
        self.send(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn get_page(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::get(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }
}

/// Returns the `name=value` pair of the session cookie set by a response.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("app-auth="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn is_login_redirect(response: &Response<Body>) -> bool {
    response.status() == StatusCode::TEMPORARY_REDIRECT
        && response
            .headers()
            .get(header::LOCATION)
            .map(|location| location == "/login")
            .unwrap_or(false)
}
