//! Derived events published on the event bus, and the liveness signals that
//! feed the reactor.
//!
//! Every derived event is immutable once built and carries everything a
//! consumer needs to render it, so consumers never call back into the
//! pipeline.

use alloy::primitives::{I256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{
	AddressLock, BlockSummary, Contract, ContractEvent, CryptoCurrency, NetworkType, Transaction,
	TransactionReceipt,
};

/// Outcome reported to external systems for a correlated transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
	Committed,
	Rejected,
}

impl PaymentStatus {
	pub fn from_success(success: bool) -> Self {
		if success {
			Self::Committed
		} else {
			Self::Rejected
		}
	}
}

/// Full decoded log of a transaction that deployed or called a watched contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEventsEvent {
	pub network: NetworkType,
	pub contract: Contract,
	pub events: Vec<ContractEvent>,
	pub transaction: Transaction,
	pub receipt: TransactionReceipt,
	pub block: BlockSummary,
}

/// A locked address sent a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionUnlockedEvent {
	pub network: NetworkType,
	pub lock: AddressLock,
	pub transaction: Transaction,
	pub receipt: TransactionReceipt,
}

/// The balance of a monitored gateway address moved.
///
/// `delta` is `previous - actual_balance`, so withdrawals are positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FgwBalanceChangedEvent {
	pub network: NetworkType,
	pub address: String,
	pub actual_balance: U256,
	pub delta: I256,
	pub currency: CryptoCurrency,
	pub block_number: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCreatedNotify {
	pub network: NetworkType,
	pub contract_id: i64,
	pub status: PaymentStatus,
	pub tx_hash: String,
	/// Name of the created account
	pub created: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenCreatedNotify {
	pub network: NetworkType,
	pub contract_id: i64,
	pub status: PaymentStatus,
	pub tx_hash: String,
	pub token_address: String,
}

/// Broadcast alert: no new block was observed for too long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStuckEvent {
	pub network: NetworkType,
	pub last_seen_time: DateTime<Utc>,
	pub last_block_height: u64,
	pub last_block_time: DateTime<Utc>,
	pub block_link: String,
	/// Markdown text to broadcast
	pub message: String,
}

/// Broadcast alert: the pending pool stayed empty for too long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingStuckEvent {
	pub network: NetworkType,
	pub last_seen_time: DateTime<Utc>,
	pub pending_count: u64,
	/// Markdown text to broadcast
	pub message: String,
}

/// Exact kind of a derived event, used for subscriptions and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
	ContractEvents,
	TransactionUnlocked,
	FgwBalanceChanged,
	AccountCreatedNotify,
	TokenCreatedNotify,
	NetworkStuck,
	PendingStuck,
}

impl EventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::ContractEvents => "contract_events",
			Self::TransactionUnlocked => "transaction_unlocked",
			Self::FgwBalanceChanged => "fgw_balance_changed",
			Self::AccountCreatedNotify => "account_created_notify",
			Self::TokenCreatedNotify => "token_created_notify",
			Self::NetworkStuck => "network_stuck",
			Self::PendingStuck => "pending_stuck",
		}
	}

	pub fn category(&self) -> EventCategory {
		match self {
			Self::NetworkStuck | Self::PendingStuck => EventCategory::Broadcast,
			Self::AccountCreatedNotify | Self::TokenCreatedNotify => EventCategory::ExternalNotify,
			Self::ContractEvents | Self::TransactionUnlocked => EventCategory::Contract,
			Self::FgwBalanceChanged => EventCategory::Balance,
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Coarse grouping of event kinds consumers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
	/// Alerts sent to every operator channel
	Broadcast,
	/// Notifications forwarded to external systems
	ExternalNotify,
	/// Activity of watched contracts and locks
	Contract,
	/// Gateway balance movements
	Balance,
}

/// Every event the pipeline, tracker and reactor publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DerivedEvent {
	ContractEvents(Box<ContractEventsEvent>),
	TransactionUnlocked(Box<TransactionUnlockedEvent>),
	FgwBalanceChanged(FgwBalanceChangedEvent),
	AccountCreatedNotify(AccountCreatedNotify),
	TokenCreatedNotify(TokenCreatedNotify),
	NetworkStuck(NetworkStuckEvent),
	PendingStuck(PendingStuckEvent),
}

impl DerivedEvent {
	pub fn kind(&self) -> EventKind {
		match self {
			Self::ContractEvents(_) => EventKind::ContractEvents,
			Self::TransactionUnlocked(_) => EventKind::TransactionUnlocked,
			Self::FgwBalanceChanged(_) => EventKind::FgwBalanceChanged,
			Self::AccountCreatedNotify(_) => EventKind::AccountCreatedNotify,
			Self::TokenCreatedNotify(_) => EventKind::TokenCreatedNotify,
			Self::NetworkStuck(_) => EventKind::NetworkStuck,
			Self::PendingStuck(_) => EventKind::PendingStuck,
		}
	}

	pub fn category(&self) -> EventCategory {
		self.kind().category()
	}

	pub fn network(&self) -> NetworkType {
		match self {
			Self::ContractEvents(event) => event.network,
			Self::TransactionUnlocked(event) => event.network,
			Self::FgwBalanceChanged(event) => event.network,
			Self::AccountCreatedNotify(event) => event.network,
			Self::TokenCreatedNotify(event) => event.network,
			Self::NetworkStuck(event) => event.network,
			Self::PendingStuck(event) => event.network,
		}
	}
}

impl From<ContractEventsEvent> for DerivedEvent {
	fn from(event: ContractEventsEvent) -> Self {
		Self::ContractEvents(Box::new(event))
	}
}

impl From<TransactionUnlockedEvent> for DerivedEvent {
	fn from(event: TransactionUnlockedEvent) -> Self {
		Self::TransactionUnlocked(Box::new(event))
	}
}

impl From<FgwBalanceChangedEvent> for DerivedEvent {
	fn from(event: FgwBalanceChangedEvent) -> Self {
		Self::FgwBalanceChanged(event)
	}
}

impl From<AccountCreatedNotify> for DerivedEvent {
	fn from(event: AccountCreatedNotify) -> Self {
		Self::AccountCreatedNotify(event)
	}
}

impl From<TokenCreatedNotify> for DerivedEvent {
	fn from(event: TokenCreatedNotify) -> Self {
		Self::TokenCreatedNotify(event)
	}
}

impl From<NetworkStuckEvent> for DerivedEvent {
	fn from(event: NetworkStuckEvent) -> Self {
		Self::NetworkStuck(event)
	}
}

impl From<PendingStuckEvent> for DerivedEvent {
	fn from(event: PendingStuckEvent) -> Self {
		Self::PendingStuck(event)
	}
}

/// Raised when a network produced no block for longer than its threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStuckSignal {
	pub network: NetworkType,
	/// When the last block was received locally
	pub last_seen_time: DateTime<Utc>,
	pub last_block_height: u64,
	/// Timestamp recorded in the last block
	pub last_block_time: DateTime<Utc>,
}

/// Raised when a network's pending pool stayed empty for longer than its
/// threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStuckSignal {
	pub network: NetworkType,
	pub last_seen_time: DateTime<Utc>,
	pub pending_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LivenessSignal {
	NetworkStuck(NetworkStuckSignal),
	PendingStuck(PendingStuckSignal),
}

impl LivenessSignal {
	pub fn network(&self) -> NetworkType {
		match self {
			Self::NetworkStuck(signal) => signal.network,
			Self::PendingStuck(signal) => signal.network,
		}
	}
}
