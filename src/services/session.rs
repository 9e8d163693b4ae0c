use chrono::Utc;

use crate::config::Config;
use crate::crypto::signing::{constant_time_eq, SigningKey};
use crate::models::session::{signing_payload, RawSessionToken, SessionToken, THIRTY_DAYS_MS};

/// Mints and verifies stateless session tokens.
///
/// Nothing is stored server side. Rotating the signing secret is the only
/// way to invalidate tokens before they expire.
#[derive(Clone)]
pub struct SessionAuthority {
    key: SigningKey,
}

impl SessionAuthority {
    /// Creates a new `SessionAuthority` keyed by the configured session secret.
    pub fn new(config: &Config) -> Self {
        Self::with_secret(config.session_secret.as_bytes())
    }

    /// Creates a new `SessionAuthority` from a raw secret.
    pub fn with_secret(secret: &[u8]) -> Self {
        Self {
            key: SigningKey::new(secret),
        }
    }

    /// Issues a token valid for 30 days from now.
    pub fn issue_token(&self) -> String {
        self.issue_token_at(now_ms())
    }

    /// Issues a token as if the clock read `now_ms`.
    pub fn issue_token_at(&self, now_ms: i64) -> String {
        let created_at = now_ms;
        let expires_at = created_at.saturating_add(THIRTY_DAYS_MS);
        let signature = self
            .key
            .sign_hex(signing_payload(created_at, expires_at).as_bytes());

        SessionToken {
            created_at,
            expires_at,
            signature,
        }
        .to_string()
    }

    /// Checks an untrusted cookie value against the current time.
    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, now_ms())
    }

    /// Checks an untrusted cookie value as if the clock read `now_ms`.
    ///
    /// Never panics: any malformed input is simply invalid.
    pub fn is_valid_at(&self, token: &str, now_ms: i64) -> bool {
        let Some(raw) = RawSessionToken::split(token) else {
            return false;
        };
        let Some((_, expires_at)) = raw.timestamps() else {
            return false;
        };

        let expected = self.key.sign_hex(raw.payload().as_bytes());
        if !constant_time_eq(expected.as_bytes(), raw.signature.as_bytes()) {
            return false;
        }

        now_ms <= expires_at
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
