/// The subscriber side of the notification hub.
///
/// `GET /stream` holds a `text/event-stream` response open for the
/// lifetime of the connection. actix drops the response body as soon as
/// the client goes away; the body is a guard that deregisters the
/// subscriber on drop, so the hub forgets it at that moment rather than
/// on the next failed write.
use actix_web::{get, web, HttpResponse};
use bytes::Bytes;
use futures::Stream;
use serde::Deserialize;
use serde_json::json;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::config::DEFAULT_CHANNEL;
use crate::sse::{ChannelHub, StreamEvent, SubscriberId};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub channel: Option<String>,
}

/// Response body for one `/stream` connection.
///
/// Yields SSE frames from the subscriber's receiver. Dropping the body
/// is the disconnect signal, and the drop handler removes the
/// subscriber from its channel right away.
struct SubscriberStream {
    events: UnboundedReceiverStream<StreamEvent>,
    hub: ChannelHub,
    channel: String,
    id: SubscriberId,
}

impl Stream for SubscriberStream {
    type Item = Result<Bytes, actix_web::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events)
            .poll_next(cx)
            .map(|event| event.map(|e| Ok(e.to_frame())))
    }
}

impl Drop for SubscriberStream {
    fn drop(&mut self) {
        let hub = self.hub.clone();
        let channel = std::mem::take(&mut self.channel);
        let id = self.id;
        tokio::spawn(async move {
            tracing::info!(%channel, "stream subscriber disconnected: {}", id.as_uuid());
            hub.remove_subscriber(&channel, id).await;
        });
    }
}

#[get("/stream")]
pub async fn stream(query: web::Query<StreamQuery>, state: web::Data<AppState>) -> HttpResponse {
    let channel = query
        .channel
        .clone()
        .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

    let (subscriber_id, rx) = state.hub.subscribe(&channel).await;
    tracing::info!(%channel, "stream subscriber connected: {}", subscriber_id.as_uuid());

    // Keepalive loop. Once the subscriber has been deregistered (or its
    // receiver is gone) the ping fails and the task exits.
    let hub = state.hub.clone();
    let ping_channel = channel.clone();
    let keepalive = Duration::from_secs(state.config.keepalive_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(keepalive);
        interval.tick().await; // the first tick completes immediately
        loop {
            interval.tick().await;
            if !hub.ping(&ping_channel, subscriber_id).await {
                break;
            }
        }
    });

    let body = SubscriberStream {
        events: UnboundedReceiverStream::new(rx),
        hub: state.hub.clone(),
        channel,
        id: subscriber_id,
    };

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache, no-transform"))
        .insert_header(("Connection", "keep-alive"))
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .streaming(body)
}

/// Per-channel subscriber counts, for the operator dashboard.
#[get("/api/stream/status")]
pub async fn stream_status(state: web::Data<AppState>) -> HttpResponse {
    let channels = state.hub.channel_counts().await;
    let total: usize = channels.values().sum();

    HttpResponse::Ok().json(json!({
        "channels": channels,
        "total_subscribers": total,
    }))
}
