//! Block data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{NetworkType, Transaction};

/// A block with its transactions indexed by every address they touch.
///
/// Index keys are normalized with [`NetworkType::normalize_address`], so they
/// are lowercase on networks with case-insensitive addresses. A block is only
/// built through [`Block::new`]; decoded block data goes through
/// [`BlockData::into_block`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
	pub number: u64,
	pub hash: String,
	pub timestamp: DateTime<Utc>,
	pub transactions: Vec<Transaction>,
	#[serde(skip)]
	transactions_by_address: HashMap<String, Vec<Transaction>>,
}

/// Block as delivered by a block source, before indexing.
///
/// Unknown fields, including any precomputed address index, are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockData {
	pub number: u64,
	pub hash: String,
	pub timestamp: DateTime<Utc>,
	#[serde(default)]
	pub transactions: Vec<Transaction>,
}

impl BlockData {
	pub fn into_block(self, network: NetworkType) -> Block {
		Block::new(
			network,
			self.number,
			self.hash,
			self.timestamp,
			self.transactions,
		)
	}
}

impl Block {
	/// Creates a block and builds its address index from every input and
	/// output of every transaction.
	pub fn new(
		network: NetworkType,
		number: u64,
		hash: impl Into<String>,
		timestamp: DateTime<Utc>,
		transactions: Vec<Transaction>,
	) -> Self {
		let mut transactions_by_address: HashMap<String, Vec<Transaction>> = HashMap::new();
		for transaction in &transactions {
			let mut keys: Vec<String> = Vec::new();
			for address in transaction.addresses() {
				let key = network.normalize_address(address);
				if !keys.contains(&key) {
					keys.push(key);
				}
			}
			for key in keys {
				transactions_by_address
					.entry(key)
					.or_default()
					.push(transaction.clone());
			}
		}

		Self {
			number,
			hash: hash.into(),
			timestamp,
			transactions,
			transactions_by_address,
		}
	}

	pub fn transactions_by_address(&self) -> &HashMap<String, Vec<Transaction>> {
		&self.transactions_by_address
	}

	/// Transactions touching `address`, looked up by exact index key.
	pub fn transactions_for(&self, address: &str) -> &[Transaction] {
		self.transactions_by_address
			.get(address)
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}

	/// Index keys that are the first input of at least one of their
	/// transactions.
	pub fn sender_addresses(&self) -> HashSet<String> {
		self.transactions_by_address
			.iter()
			.filter(|(address, transactions)| transactions.iter().any(|tx| tx.is_sent_by(address)))
			.map(|(address, _)| address.clone())
			.collect()
	}

	/// Hashes of every transaction in the block.
	pub fn transaction_hashes(&self) -> HashSet<String> {
		self.transactions.iter().map(|tx| tx.hash.clone()).collect()
	}

	pub fn summary(&self) -> BlockSummary {
		BlockSummary {
			number: self.number,
			hash: self.hash.clone(),
			timestamp: self.timestamp,
		}
	}
}

/// Identifying part of a block, carried by derived events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
	pub number: u64,
	pub hash: String,
	pub timestamp: DateTime<Utc>,
}

/// A block freshly observed on a network.
#[derive(Debug, Clone)]
pub struct NewBlockEvent {
	pub network_type: NetworkType,
	pub block: Block,
}

impl NewBlockEvent {
	pub fn new(network_type: NetworkType, block: Block) -> Self {
		Self {
			network_type,
			block,
		}
	}
}
