//! Liveness monitoring.
//!
//! - `watchdog`: records chain activity and raises stuck signals
//! - `reactor`: turns signals into broadcast alerts

mod reactor;
mod watchdog;

pub use reactor::LivenessReactor;
pub use watchdog::{run_watchdog, ActivityTracker};
