//! Utility modules for common functionality.
//!
//! - constants: Constants for the application
//! - logging: Logging and error context utilities
//! - metrics: Prometheus metrics
//! - tests: Builders shared by unit and integration tests

pub mod constants;
pub mod logging;
pub mod metrics;

pub use constants::*;
