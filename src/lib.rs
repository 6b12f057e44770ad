//! Blockchain event scanning core.
//!
//! This library correlates new blocks with watched entities and publishes the
//! resulting derived events. It includes:
//!
//! - Lock, contract events and EOS actions monitors
//! - Gateway balance delta tracking
//! - Liveness watchdog and stuck-network alerts
//! - A typed event bus with webhook and log consumers
//!
//! # Module Structure
//!
//! - `bootstrap`: Wires the services and consumers together
//! - `models`: Data structures for configuration, blocks and events
//! - `repositories`: Network catalog and watch registry
//! - `services`: Core business logic
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
