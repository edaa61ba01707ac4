//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON)
//! - HTTP clients for the liveness probe and the geolocation service
//! - The concrete lookup adapters selected by the configuration

mod adapters;
mod client;
mod logger;

// Re-export public API
pub use adapters::init_adapters;
pub use client::{init_geo_client, init_probe_client};
pub use logger::init_logger_with;
