//! Config service: seeds and records the durable configuration log

pub mod config;
pub mod service;

pub use config::ConfigServiceConfig;
pub use service::ConfigService;
