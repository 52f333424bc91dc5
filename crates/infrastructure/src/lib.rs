//! Intercept Infrastructure - Adapters and ambient setup
//!
//! This crate provides an in-memory implementation of the interceptor port
//! plus configuration loading and tracing initialisation.

pub mod adapters;
pub mod config;
pub mod logging;

pub use adapters::{IncomingRequest, MockScope};
pub use config::{ConfigError, TIMEOUT_ENV, load_settings, settings_from_lookup};
pub use logging::init_tracing;
