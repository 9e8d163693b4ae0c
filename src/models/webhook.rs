use sonic_rs::{JsonContainerTrait, JsonValueTrait, Value};

/// Header carrying the hex HMAC of the delivery.
pub const SIGNATURE_HEADER: &str = "x-orb-signature-v1";
/// Header carrying the timestamp bound into the signature.
pub const TIMESTAMP_HEADER: &str = "x-orb-timestamp";

/// An authenticated Orb webhook delivery.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// The event id, when Orb sent one.
    pub id: Option<String>,
    /// The event type, e.g. `subscription.started`.
    pub event_type: Option<String>,
    /// The full payload.
    pub payload: Value,
}

impl WebhookEvent {
    /// Wraps a parsed payload, picking out the well-known fields.
    pub fn from_value(payload: Value) -> Self {
        let id = payload
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let event_type = payload
            .get("type")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Self {
            id,
            event_type,
            payload,
        }
    }

    /// Number of top-level keys in the payload, zero for non-objects.
    pub fn field_count(&self) -> usize {
        self.payload.as_object().map_or(0, |object| object.len())
    }
}
