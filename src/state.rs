use std::sync::Arc;

use crate::{config::Config, services::HospitalDirectory, sse::ChannelHub};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub hub: ChannelHub,
    pub directory: Arc<HospitalDirectory>,
    /// Shared client for the ESP32/Blynk proxies.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            hub: ChannelHub::new(),
            directory: Arc::new(HospitalDirectory::new()),
            http: reqwest::Client::new(),
        }
    }
}
