pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod sse;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use sse::{ChannelHub, StreamEvent, SubscriberId};
pub use state::AppState;
