// Re-export route modules
pub mod devices;
pub mod hospitals;
pub mod notify;
pub mod stream;
