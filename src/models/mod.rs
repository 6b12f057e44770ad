//! Domain models and data structures for the monitor core.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: Chain-agnostic blocks, transactions and receipts
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Network, Currency, watched entities)
//! - `events`: Derived events and liveness signals

mod blockchain;
mod config;
mod core;
mod events;

// Re-export blockchain types
pub use blockchain::{
	Block, BlockData, BlockSummary, ContractEvent, NewBlockEvent, Transaction, TransactionReceipt,
};

// Re-export core types
pub use core::{
	format_amount, format_signed_amount, AddressLock, Contract, CryptoCurrency, ExplorerConfig,
	LivenessConfig, NetworkConfig, NetworkProviderType, NetworkType, WatchedEntity,
};

// Re-export event types
pub use events::{
	AccountCreatedNotify, ContractEventsEvent, DerivedEvent, EventCategory, EventKind,
	FgwBalanceChangedEvent, LivenessSignal, NetworkStuckEvent, NetworkStuckSignal,
	PaymentStatus, PendingStuckEvent, PendingStuckSignal, TokenCreatedNotify,
	TransactionUnlockedEvent,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader};
