/// Proxy endpoints toward the traffic-light hardware and IoT cloud.
///
/// These exist so device addresses and the Blynk token never reach the
/// browser; all real work happens in `services::iot`.
use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::services::iot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Esp32Request {
    pub action: Option<String>,
}

#[post("/api/esp32")]
pub async fn esp32(
    body: web::Json<Esp32Request>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let action = body.action.clone().unwrap_or_else(|| "green".to_string());
    let text = iot::set_traffic_light(&state.http, &state.config, &action).await?;
    Ok(HttpResponse::Ok().body(text))
}

#[derive(Debug, Deserialize)]
pub struct BlynkRequest {
    pub pin: Option<String>,
    pub value: Option<serde_json::Value>,
    pub action: Option<String>,
}

#[post("/api/blynk")]
pub async fn blynk(
    body: web::Json<BlynkRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    let pin = request.pin.unwrap_or_else(|| "v0".to_string());
    let value = request.value.unwrap_or_else(|| serde_json::json!(0));
    let action = request.action.unwrap_or_else(|| "update".to_string());

    let text = iot::blynk_update(&state.http, &state.config, &pin, &value, &action).await?;
    Ok(HttpResponse::Ok().body(text))
}

#[derive(Debug, Deserialize)]
pub struct MqttRequest {
    pub action: Option<String>,
    pub led: Option<String>,
}

#[post("/api/mqtt")]
pub async fn mqtt(
    body: web::Json<MqttRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    let action = request.action.unwrap_or_else(|| "toggle".to_string());
    let led = request.led.unwrap_or_else(|| "green".to_string());

    let ack = iot::mqtt_bridge(&state.config, &action, &led)?;
    Ok(HttpResponse::Ok().json(ack))
}

#[derive(Debug, Deserialize)]
pub struct WebSocketBridgeRequest {
    pub message: Option<String>,
}

#[post("/api/websocket")]
pub async fn websocket_bridge(
    body: web::Json<WebSocketBridgeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let message = body
        .message
        .clone()
        .unwrap_or_else(|| "green_toggle".to_string());

    let ack = iot::websocket_bridge(&state.config, &message)?;
    Ok(HttpResponse::Ok().json(ack))
}
