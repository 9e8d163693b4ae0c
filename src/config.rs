use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Password used when `APP_PASSWORD` is not set. Never deploy with it.
pub const DEFAULT_APP_PASSWORD: &str = "changeme";

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The shared password accepted by the login endpoint.
    pub app_password: Zeroizing<String>,
    /// The key used to sign session tokens.
    pub session_secret: Zeroizing<String>,
    /// The secret shared with Orb for webhook signatures, if configured.
    pub webhook_secret: Option<Zeroizing<String>>,
    /// Whether the request gate enforces a session.
    pub password_protection: bool,
    /// Whether the service runs in production (enables `Secure` cookies).
    pub production: bool,
    /// The address the server listens on.
    pub bind_addr: SocketAddr,
    /// The directory served behind the gate.
    pub static_dir: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let app_password = match env::var("APP_PASSWORD") {
            Ok(password) if !password.is_empty() => password,
            _ => {
                tracing::warn!(
                    "⚠️  APP_PASSWORD not set, falling back to the default password. Set it before deploying!"
                );
                DEFAULT_APP_PASSWORD.to_string()
            }
        };

        let session_secret = env::var("SESSION_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .unwrap_or_else(|| app_password.clone());

        let webhook_secret = env::var("ORB_WEBHOOK_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .map(Zeroizing::new);

        if webhook_secret.is_none() {
            tracing::warn!("⚠️  ORB_WEBHOOK_SECRET not set, webhook deliveries will be rejected");
        }

        let password_protection = match env::var("ENABLE_PASSWORD_PROTECTION") {
            Ok(flag) => parse_flag(&flag)
                .with_context(|| format!("Invalid ENABLE_PASSWORD_PROTECTION: {}", flag))?,
            Err(_) => true,
        };

        let production = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string()) == "production";

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .context("Invalid BIND_ADDR")?;

        Ok(Self {
            app_password: Zeroizing::new(app_password),
            session_secret: Zeroizing::new(session_secret),
            webhook_secret,
            password_protection,
            production,
            bind_addr,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
        })
    }

    /// Creates a `Config` with explicit secrets and development defaults.
    ///
    /// The session signing key is the password, as with an unset `SESSION_SECRET`.
    pub fn new(app_password: &str, webhook_secret: Option<&str>) -> Self {
        Self {
            app_password: Zeroizing::new(app_password.to_string()),
            session_secret: Zeroizing::new(app_password.to_string()),
            webhook_secret: webhook_secret.map(|secret| Zeroizing::new(secret.to_string())),
            password_protection: true,
            production: false,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: "public".to_string(),
        }
    }

    /// Returns `true` if the login password is still the built-in default.
    pub fn uses_default_password(&self) -> bool {
        self.app_password.as_str() == DEFAULT_APP_PASSWORD
    }
}

/// Parses a boolean-ish environment flag.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
