//! Test helper utilities for blocks
//!
//! - `BlockBuilder`: Builder for creating test Block and NewBlockEvent instances

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Block, NetworkType, NewBlockEvent, Transaction};

/// A builder for creating test blocks with default values.
#[derive(Debug)]
pub struct BlockBuilder {
	network: NetworkType,
	number: u64,
	hash: Option<String>,
	timestamp: DateTime<Utc>,
	transactions: Vec<Transaction>,
}

impl Default for BlockBuilder {
	fn default() -> Self {
		Self {
			network: NetworkType::EthereumMainnet,
			number: 1,
			hash: None,
			timestamp: Utc
				.timestamp_opt(1_700_000_000, 0)
				.single()
				.unwrap_or_default(),
			transactions: Vec::new(),
		}
	}
}

impl BlockBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Network used to normalize the address index.
	pub fn network(mut self, network: NetworkType) -> Self {
		self.network = network;
		self
	}

	pub fn number(mut self, number: u64) -> Self {
		self.number = number;
		self
	}

	/// Default is `0xblock{number}`.
	pub fn hash(mut self, hash: &str) -> Self {
		self.hash = Some(hash.to_string());
		self
	}

	pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
		self.timestamp = timestamp;
		self
	}

	pub fn transaction(mut self, transaction: Transaction) -> Self {
		self.transactions.push(transaction);
		self
	}

	pub fn transactions(mut self, transactions: Vec<Transaction>) -> Self {
		self.transactions = transactions;
		self
	}

	pub fn build(self) -> Block {
		let hash = self
			.hash
			.unwrap_or_else(|| format!("0xblock{}", self.number));
		Block::new(
			self.network,
			self.number,
			hash,
			self.timestamp,
			self.transactions,
		)
	}

	/// Builds the block wrapped in a `NewBlockEvent` for its network.
	pub fn build_event(self) -> NewBlockEvent {
		let network = self.network;
		NewBlockEvent::new(network, self.build())
	}
}
