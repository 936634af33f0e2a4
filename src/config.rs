use dotenvy::dotenv;
use std::env;

use crate::error::AppError;

/// Channel that publishers and subscribers fall back to when none is given.
pub const DEFAULT_CHANNEL: &str = "hospital";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Interval between keepalive pings on an open event stream.
    pub keepalive_secs: u64,
    /// ESP32 traffic-light controller address (host or host:port).
    pub esp32_ip: Option<String>,
    /// ESP32 WebSocket bridge address (placeholder integration).
    pub esp32_ws_ip: Option<String>,
    /// Token for the Blynk cloud HTTP API.
    pub blynk_token: Option<String>,
    /// MQTT broker URL (placeholder integration).
    pub mqtt_broker_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            keepalive_secs: 15,
            esp32_ip: None,
            esp32_ws_ip: None,
            blynk_token: None,
            mqtt_broker_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);
        let keepalive_secs = env::var("SSE_KEEPALIVE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15);
        if keepalive_secs == 0 {
            return Err(AppError::Config(
                "SSE_KEEPALIVE_SECS must be positive".into(),
            ));
        }

        Ok(Self {
            port,
            keepalive_secs,
            esp32_ip: env::var("ESP32_IP").ok(),
            esp32_ws_ip: env::var("ESP32_WS_IP").ok(),
            blynk_token: env::var("BLYNK_TOKEN").ok(),
            mqtt_broker_url: env::var("MQTT_BROKER_URL").ok(),
        })
    }
}
