/// The publisher side of the notification hub.
use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::DEFAULT_CHANNEL;
use crate::sse::StreamEvent;
use crate::state::AppState;

/// Message used when the publisher does not supply one.
pub const DEFAULT_MESSAGE: &str = "Ambulance en route";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub channel: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "hospitalId")]
    pub hospital_id: Option<String>,
    pub meta: Option<serde_json::Value>,
}

/// Broadcast a `notify` event to every subscriber of a channel.
///
/// Returns `{"ok": true}` once delivery has been attempted for every
/// current subscriber; per-subscriber write failures only affect
/// channel membership and are never surfaced to the publisher.
#[post("/notify")]
pub async fn notify(body: web::Json<NotifyRequest>, state: web::Data<AppState>) -> HttpResponse {
    let request = body.into_inner();

    let channel = request
        .channel
        .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
    let message = request
        .message
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    let hospital_id = request.hospital_id.unwrap_or_default();
    let meta = request.meta.unwrap_or_else(|| json!({}));

    let event = StreamEvent::notify(message, hospital_id, meta);
    let delivered = state.hub.broadcast(&channel, event).await;
    tracing::info!(%channel, delivered, "notify broadcast");

    HttpResponse::Ok().json(json!({ "ok": true }))
}
