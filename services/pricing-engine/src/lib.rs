//! Pricing engine service: tier transform and quote fan-out

pub mod config;
pub mod engine;
pub mod pipe;
pub mod pricer;

pub use config::PricingEngineConfig;
pub use engine::CoreEventLoop;
pub use pipe::QuotePricerPipe;
