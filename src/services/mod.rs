//! Core services implementing the business logic.
//!
//! - `balance`: Gateway balance delta tracking
//! - `blockchain`: Fetcher and explorer seams to the chains
//! - `event_bus`: Typed publish/subscribe of derived events
//! - `liveness`: Freshness watchdog and stuck alerts
//! - `monitor`: Block monitors and the pipeline dispatching blocks to them
//! - `notification`: Event consumers

pub mod balance;
pub mod blockchain;
pub mod event_bus;
pub mod liveness;
pub mod monitor;
pub mod notification;
