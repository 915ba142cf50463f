//! Market data service: stochastic FX generator publishing raw quotes

pub mod calendar;
pub mod config;
pub mod generator;

pub use config::MarketDataConfig;
pub use generator::{FxPriceGenerator, TickThrottle};
