//! Core domain models for the monitor core.
//!
//! This module contains the fundamental data structures that represent:
//! - Networks: chain + environment identifiers and their configuration
//! - Currencies: decimals, tickers and raw amount rendering
//! - Watched entities: contracts and address locks registered by the operator

mod currency;
mod network;
mod watched;

pub use currency::{format_amount, format_signed_amount, CryptoCurrency};
pub use network::{ExplorerConfig, LivenessConfig, NetworkConfig, NetworkProviderType, NetworkType};
pub use watched::{AddressLock, Contract, WatchedEntity};
