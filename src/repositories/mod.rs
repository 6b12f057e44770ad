//! Repository implementations.
//!
//! This module provides traits and implementations for the data the monitor
//! core looks up:
//!
//! - Network: Loads network configurations and exposes the network catalog
//! - Watch: Looks up watched contracts and address locks by transaction hash or
//!   address

mod error;
mod network;
mod watch;

pub use error::RepositoryError;
pub use network::{NetworkCatalog, NetworkRepository, NetworkRepositoryTrait, NetworkService};
pub use watch::{InMemoryWatchRegistry, WatchRegistry};
