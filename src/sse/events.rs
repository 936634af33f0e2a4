/// Wire format for events delivered over the `/stream` endpoint.
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single event on a notification channel.
///
/// Serialized with a lowercase `type` discriminator; field names match
/// what the hospital console pages already consume (`clientId`,
/// `hospitalId`, `ts` in epoch milliseconds).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Handshake sent once per subscriber, immediately after registration.
    Connected {
        #[serde(rename = "clientId")]
        client_id: Uuid,
        channel: String,
        ts: i64,
    },

    /// Periodic keepalive so idle connections are not dropped by proxies.
    Ping { ts: i64 },

    /// A broadcast published via `POST /notify`.
    ///
    /// `meta` is an opaque caller-supplied blob; the hub forwards it
    /// verbatim and never inspects it.
    Notify {
        message: String,
        #[serde(rename = "hospitalId")]
        hospital_id: String,
        meta: serde_json::Value,
        ts: i64,
    },
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl StreamEvent {
    /// Create a connected handshake event
    pub fn connected(client_id: Uuid, channel: &str) -> Self {
        StreamEvent::Connected {
            client_id,
            channel: channel.to_string(),
            ts: now_ms(),
        }
    }

    /// Create a keepalive event
    pub fn ping() -> Self {
        StreamEvent::Ping { ts: now_ms() }
    }

    /// Create a notification event
    pub fn notify(message: String, hospital_id: String, meta: serde_json::Value) -> Self {
        StreamEvent::Notify {
            message,
            hospital_id,
            meta,
            ts: now_ms(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Encode as one server-sent-event frame: `data: <json>\n\n`.
    pub fn to_frame(&self) -> Bytes {
        // Serializing a StreamEvent cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        Bytes::from(format!("data: {json}\n\n"))
    }
}
