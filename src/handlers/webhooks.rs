use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::Result,
    models::webhook::{SIGNATURE_HEADER, TIMESTAMP_HEADER},
    state::AppState,
};

/// The acknowledgement sent back to Orb.
#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Receives an Orb webhook delivery.
///
/// The body is taken as raw bytes because the signature covers it verbatim.
#[axum::debug_handler]
pub async fn orb_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    state.webhooks.verify(
        &body,
        header_str(&headers, SIGNATURE_HEADER),
        header_str(&headers, TIMESTAMP_HEADER),
    )?;

    let event = state.webhooks.parse_event(&body)?;

    tracing::info!(
        event_id = event.id.as_deref().unwrap_or("unknown"),
        event_type = event.event_type.as_deref().unwrap_or("unknown"),
        fields = event.field_count(),
        "📬 Orb webhook received"
    );

    Ok((StatusCode::OK, Json(WebhookAck { received: true })).into_response())
}

