//! Entities the operator registered interest in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::NetworkType;

/// A deployed (or deploying) contract, correlated by its deployment
/// transaction hash.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Contract {
	pub id: i64,
	pub network: NetworkType,
	#[serde(default)]
	pub address: Option<String>,
	#[serde(default)]
	pub tx_hash: Option<String>,
}

/// An address locked until it sends a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AddressLock {
	pub id: i64,
	pub network: NetworkType,
	pub address: String,
	#[serde(default)]
	pub locked_at: Option<DateTime<Utc>>,
}

/// A registry record the monitors react to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum WatchedEntity {
	Contract(Contract),
	AddressLock(AddressLock),
}

impl WatchedEntity {
	pub fn id(&self) -> i64 {
		match self {
			Self::Contract(contract) => contract.id,
			Self::AddressLock(lock) => lock.id,
		}
	}

	pub fn network(&self) -> NetworkType {
		match self {
			Self::Contract(contract) => contract.network,
			Self::AddressLock(lock) => lock.network,
		}
	}

	/// Tracked address, if the entity is correlated by address.
	pub fn address(&self) -> Option<&str> {
		match self {
			Self::Contract(contract) => contract.address.as_deref(),
			Self::AddressLock(lock) => Some(lock.address.as_str()),
		}
	}

	/// Tracked transaction hash, if the entity is correlated by hash.
	pub fn tx_hash(&self) -> Option<&str> {
		match self {
			Self::Contract(contract) => contract.tx_hash.as_deref(),
			Self::AddressLock(_) => None,
		}
	}
}

impl From<Contract> for WatchedEntity {
	fn from(contract: Contract) -> Self {
		Self::Contract(contract)
	}
}

impl From<AddressLock> for WatchedEntity {
	fn from(lock: AddressLock) -> Self {
		Self::AddressLock(lock)
	}
}
