/// Device-side integrations for the signal demo.
///
/// The ESP32 and Blynk calls are real HTTP proxies; the MQTT and
/// WebSocket bridges are placeholder integrations that only validate
/// configuration and return canned acknowledgements.
use serde_json::json;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Traffic-light actions understood by the ESP32 firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficAction {
    Green,
    Red,
    Yellow,
}

impl TrafficAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "green" => Some(Self::Green),
            "red" => Some(Self::Red),
            "yellow" => Some(Self::Yellow),
            _ => None,
        }
    }

    /// Path on the ESP32 web server.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Green => "/green",
            Self::Red => "/red",
            Self::Yellow => "/yellow",
        }
    }
}

/// Forward a traffic-light command to the ESP32 controller.
pub async fn set_traffic_light(
    http: &reqwest::Client,
    config: &Config,
    action: &str,
) -> AppResult<String> {
    let esp32_ip = config
        .esp32_ip
        .as_deref()
        .ok_or_else(|| AppError::Config("Missing ESP32_IP env".into()))?;

    let action = TrafficAction::parse(action).ok_or_else(|| {
        AppError::BadRequest("Invalid action. Use: green, red, yellow".into())
    })?;

    let url = format!("http://{esp32_ip}{}", action.path());
    tracing::debug!(%url, "forwarding traffic light command");

    let response = http
        .get(&url)
        .header(reqwest::header::USER_AGENT, "MedRush-TrafficControl/1.0")
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("ESP32 connection failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        tracing::warn!(status, "ESP32 returned an error");
        return Err(AppError::Upstream(format!(
            "ESP32 error: {status} - Check if ESP32 is running and IP is correct"
        )));
    }

    response
        .text()
        .await
        .map_err(|e| AppError::Internal(format!("ESP32 response read failed: {e}")))
}

/// Forward a pin update to the Blynk cloud HTTP API.
///
/// The token stays server-side; only `update` and `notify` actions are
/// allowed through.
pub async fn blynk_update(
    http: &reqwest::Client,
    config: &Config,
    pin: &str,
    value: &serde_json::Value,
    action: &str,
) -> AppResult<String> {
    let token = config
        .blynk_token
        .as_deref()
        .ok_or_else(|| AppError::Config("Missing BLYNK_TOKEN env".into()))?;

    if action != "update" && action != "notify" {
        return Err(AppError::BadRequest("Invalid action".into()));
    }

    let value_str = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let url = format!(
        "https://blynk.cloud/external/api/update?token={}&{}={}",
        urlencoding::encode(token),
        urlencoding::encode(pin),
        urlencoding::encode(&value_str),
    );

    let response = http
        .get(&url)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Blynk connection failed: {e}")))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AppError::Internal(format!("Blynk response read failed: {e}")))?;

    if !status.is_success() {
        return Err(AppError::Upstream(if text.is_empty() {
            "Blynk error".to_string()
        } else {
            text
        }));
    }

    Ok(if text.is_empty() { "ok".to_string() } else { text })
}

/// HTTP-to-MQTT bridge stub.
///
/// TODO: replace with a real MQTT client (rumqttc) once the broker
/// deployment is settled; until then this only echoes the topic.
pub fn mqtt_bridge(config: &Config, action: &str, led: &str) -> AppResult<serde_json::Value> {
    if config.mqtt_broker_url.is_none() {
        return Err(AppError::Config("Missing MQTT_BROKER_URL env".into()));
    }

    let topic = format!("medrush/led/{led}");
    tracing::info!(%topic, action, "mqtt bridge stub invoked");

    Ok(json!({
        "success": true,
        "message": format!("MQTT message '{action}' sent to topic '{topic}'"),
        "note": "This is a placeholder - implement MQTT client for full functionality",
    }))
}

/// HTTP-to-WebSocket bridge stub.
pub fn websocket_bridge(config: &Config, message: &str) -> AppResult<serde_json::Value> {
    if config.esp32_ws_ip.is_none() {
        return Err(AppError::Config("Missing ESP32_WS_IP env".into()));
    }

    tracing::info!(message, "websocket bridge stub invoked");

    Ok(json!({
        "success": true,
        "message": format!("WebSocket message '{message}' sent to ESP32"),
        "note": "This is a placeholder - implement WebSocket client for full functionality",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_action_parsing() {
        assert_eq!(TrafficAction::parse("green"), Some(TrafficAction::Green));
        assert_eq!(TrafficAction::parse("red"), Some(TrafficAction::Red));
        assert_eq!(TrafficAction::parse("yellow"), Some(TrafficAction::Yellow));
        assert_eq!(TrafficAction::parse("purple"), None);
        assert_eq!(TrafficAction::parse("GREEN"), None);
    }

    #[test]
    fn test_traffic_action_paths() {
        assert_eq!(TrafficAction::Green.path(), "/green");
        assert_eq!(TrafficAction::Red.path(), "/red");
        assert_eq!(TrafficAction::Yellow.path(), "/yellow");
    }

    #[tokio::test]
    async fn test_traffic_light_requires_config() {
        let http = reqwest::Client::new();
        let config = Config::default();

        let err = set_traffic_light(&http, &config, "green")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_traffic_light_rejects_unknown_action_before_network() {
        let http = reqwest::Client::new();
        let config = Config {
            esp32_ip: Some("192.0.2.1".to_string()),
            ..Config::default()
        };

        let err = set_traffic_light(&http, &config, "purple").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_blynk_requires_token() {
        let http = reqwest::Client::new();
        let err = blynk_update(&http, &Config::default(), "v0", &json!(1), "update")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_blynk_rejects_unknown_action() {
        let http = reqwest::Client::new();
        let config = Config {
            blynk_token: Some("token".to_string()),
            ..Config::default()
        };

        let err = blynk_update(&http, &config, "v0", &json!(1), "delete")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_mqtt_bridge_stub() {
        let config = Config {
            mqtt_broker_url: Some("mqtt://broker:1883".to_string()),
            ..Config::default()
        };

        let ack = mqtt_bridge(&config, "toggle", "green").unwrap();
        assert_eq!(ack["success"], true);
        assert!(ack["message"]
            .as_str()
            .unwrap()
            .contains("medrush/led/green"));
    }

    #[test]
    fn test_mqtt_bridge_requires_broker_url() {
        assert!(matches!(
            mqtt_bridge(&Config::default(), "toggle", "green").unwrap_err(),
            AppError::Config(_)
        ));
    }

    #[test]
    fn test_websocket_bridge_stub() {
        let config = Config {
            esp32_ws_ip: Some("192.0.2.2".to_string()),
            ..Config::default()
        };

        let ack = websocket_bridge(&config, "green_toggle").unwrap();
        assert_eq!(ack["success"], true);
        assert!(ack["message"].as_str().unwrap().contains("green_toggle"));
    }
}
