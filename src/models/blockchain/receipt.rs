//! Execution receipts and decoded contract events.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Outcome of a transaction with its decoded event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	pub transaction_hash: String,
	pub success: bool,
	#[serde(default)]
	pub logs: Vec<ContractEvent>,
}

/// Decoded on-chain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContractEvent {
	/// An account was created, `created` is the new account's name
	AccountCreated { address: String, created: String },
	/// A token was issued at `address`
	TokenCreated {
		address: String,
		issuer: String,
		symbol: String,
	},
	/// The contract self-destructed, `cashback` tells whether the remaining
	/// funds were returned
	ContractKilled { address: String, cashback: bool },
	Transfer {
		address: String,
		from: String,
		to: String,
		value: U256,
	},
}

impl ContractEvent {
	/// Address of the contract that emitted the event.
	pub fn address(&self) -> &str {
		match self {
			Self::AccountCreated { address, .. }
			| Self::TokenCreated { address, .. }
			| Self::ContractKilled { address, .. }
			| Self::Transfer { address, .. } => address,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::AccountCreated { .. } => "AccountCreated",
			Self::TokenCreated { .. } => "TokenCreated",
			Self::ContractKilled { .. } => "ContractKilled",
			Self::Transfer { .. } => "Transfer",
		}
	}
}
