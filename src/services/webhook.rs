use crate::config::Config;
use crate::crypto::signing::{constant_time_eq, SigningKey};
use crate::error::{AppError, Result};
use crate::models::webhook::WebhookEvent;

/// Message returned when no webhook secret is configured.
pub const MISSING_SECRET_MESSAGE: &str = "Webhook secret not configured";
/// Message returned when a signature or timestamp header is absent.
pub const MISSING_HEADERS_MESSAGE: &str = "Missing Orb signature or timestamp";
/// Message returned when an authenticated body is not JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON payload";

/// Computes the hex HMAC-SHA256 Orb sends for a delivery.
///
/// The signed payload is `{timestamp}.{raw_body}`, over the body bytes
/// exactly as received.
pub fn compute_signature(secret: &[u8], timestamp: &str, raw_body: &[u8]) -> String {
    SigningKey::new(secret).sign_parts_hex(&[timestamp.as_bytes(), b".", raw_body])
}

/// Authenticates inbound Orb webhook deliveries.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: Option<SigningKey>,
}

impl WebhookVerifier {
    /// Creates a new `WebhookVerifier` from the configured webhook secret.
    pub fn new(config: &Config) -> Self {
        Self::with_secret(config.webhook_secret.as_ref().map(|s| s.as_bytes()))
    }

    /// Creates a new `WebhookVerifier` from an optional raw secret.
    pub fn with_secret(secret: Option<&[u8]>) -> Self {
        Self {
            key: secret.map(SigningKey::new),
        }
    }

    /// Returns `true` if a secret is configured.
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Verifies a delivery's signature.
    ///
    /// # Arguments
    ///
    /// * `raw_body` - The request body exactly as received.
    /// * `signature` - The `X-Orb-Signature-V1` header, if present.
    /// * `timestamp` - The `X-Orb-Timestamp` header, if present.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the signature matches. Fails closed with
    /// `Configuration` when no secret is set, `MalformedRequest` when a
    /// header is missing and `InvalidSignature` on mismatch.
    pub fn verify(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
        timestamp: Option<&str>,
    ) -> Result<()> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| AppError::Configuration(MISSING_SECRET_MESSAGE.to_string()))?;

        let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
            return Err(AppError::MalformedRequest(MISSING_HEADERS_MESSAGE.to_string()));
        };

        let supplied = signature.trim();
        let supplied = supplied.strip_prefix("v1=").unwrap_or(supplied);

        let expected = key.sign_parts_hex(&[timestamp.as_bytes(), b".", raw_body]);

        if !constant_time_eq(expected.as_bytes(), supplied.as_bytes()) {
            return Err(AppError::InvalidSignature);
        }

        Ok(())
    }

    /// Parses an authenticated body as JSON.
    pub fn parse_event(&self, raw_body: &[u8]) -> Result<WebhookEvent> {
        let payload: sonic_rs::Value = sonic_rs::from_slice(raw_body)
            .map_err(|_| AppError::MalformedRequest(INVALID_JSON_MESSAGE.to_string()))?;
        Ok(WebhookEvent::from_value(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"whsec_test";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"subscription.started"}"#;
    const TIMESTAMP: &str = "2024-01-01T00:00:00.000000";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::with_secret(Some(SECRET))
    }

    #[test]
    fn signature_is_deterministic() {
        assert_eq!(
            compute_signature(SECRET, TIMESTAMP, BODY),
            compute_signature(SECRET, TIMESTAMP, BODY)
        );
    }

    #[test]
    fn signature_covers_secret_timestamp_and_body() {
        let base = compute_signature(SECRET, TIMESTAMP, BODY);
        assert_ne!(base, compute_signature(b"other", TIMESTAMP, BODY));
        assert_ne!(base, compute_signature(SECRET, "2024-01-01T00:00:01.000000", BODY));
        assert_ne!(base, compute_signature(SECRET, TIMESTAMP, b"{}"));
    }

    #[test]
    fn signature_matches_manual_hmac_over_dotted_payload() {
        let joined = format!("{}.{}", TIMESTAMP, std::str::from_utf8(BODY).unwrap());
        assert_eq!(
            compute_signature(SECRET, TIMESTAMP, BODY),
            SigningKey::new(SECRET).sign_hex(joined.as_bytes())
        );
    }

    #[test]
    fn accepts_valid_signature() {
        let signature = compute_signature(SECRET, TIMESTAMP, BODY);
        assert!(verifier().verify(BODY, Some(&signature), Some(TIMESTAMP)).is_ok());
    }

    #[test]
    fn accepts_scheme_prefixed_signature() {
        let signature = format!("v1={}", compute_signature(SECRET, TIMESTAMP, BODY));
        assert!(verifier().verify(BODY, Some(&signature), Some(TIMESTAMP)).is_ok());
    }

    #[test]
    fn rejects_signature_for_other_timestamp() {
        let signature = compute_signature(SECRET, "1999-01-01T00:00:00", BODY);
        assert!(matches!(
            verifier().verify(BODY, Some(&signature), Some(TIMESTAMP)),
            Err(AppError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_garbage_signature() {
        for signature in ["", "zz", "deadbeef"] {
            assert!(matches!(
                verifier().verify(BODY, Some(signature), Some(TIMESTAMP)),
                Err(AppError::InvalidSignature)
            ));
        }
    }

    #[test]
    fn missing_headers_are_malformed() {
        let signature = compute_signature(SECRET, TIMESTAMP, BODY);
        assert!(matches!(
            verifier().verify(BODY, None, Some(TIMESTAMP)),
            Err(AppError::MalformedRequest(msg)) if msg == MISSING_HEADERS_MESSAGE
        ));
        assert!(matches!(
            verifier().verify(BODY, Some(&signature), None),
            Err(AppError::MalformedRequest(_))
        ));
        assert!(matches!(
            verifier().verify(BODY, None, None),
            Err(AppError::MalformedRequest(_))
        ));
    }

    #[test]
    fn fails_closed_without_secret() {
        let verifier = WebhookVerifier::with_secret(None);
        assert!(!verifier.is_configured());
        let signature = compute_signature(SECRET, TIMESTAMP, BODY);
        assert!(matches!(
            verifier.verify(BODY, Some(&signature), Some(TIMESTAMP)),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            verifier.verify(BODY, None, None),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn parse_event_rejects_non_json() {
        assert!(matches!(
            verifier().parse_event(b"not json"),
            Err(AppError::MalformedRequest(msg)) if msg == INVALID_JSON_MESSAGE
        ));
        let event = verifier().parse_event(BODY).unwrap();
        assert_eq!(event.event_type.as_deref(), Some("subscription.started"));
    }
}
