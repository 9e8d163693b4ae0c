use std::sync::Arc;
use crate::config::Config;
use crate::services::session::SessionAuthority;
use crate::services::webhook::WebhookVerifier;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// Issues and checks session tokens.
    pub sessions: SessionAuthority,
    /// Authenticates Orb webhook deliveries.
    pub webhooks: WebhookVerifier,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    pub fn new(config: Config) -> Self {
        let sessions = SessionAuthority::new(&config);
        tracing::info!("✅ Session authority initialized");

        let webhooks = WebhookVerifier::new(&config);
        if webhooks.is_configured() {
            tracing::info!("✅ Webhook verifier initialized");
        } else {
            tracing::warn!("⚠️  Webhook verifier has no secret, deliveries will fail closed");
        }

        AppState {
            config: Arc::new(config),
            sessions,
            webhooks,
        }
    }
}
