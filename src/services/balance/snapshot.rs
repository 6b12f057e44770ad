//! Last confirmed balance per gateway address.

use std::{
	collections::{hash_map::Entry, HashMap},
	sync::Arc,
};

use alloy::primitives::{Sign, I256, U256};
use tokio::sync::Mutex;

use crate::models::NetworkType;

/// Balance confirmed at a block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
	pub balance: U256,
	pub height: u64,
}

/// Outcome of applying a fetched balance to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceUpdate {
	/// No snapshot existed, the fetched balance became the first one
	Initialized,
	/// The result is not newer than the stored snapshot and was dropped
	Discarded { stored_height: u64 },
	/// Same balance, only the height moved forward
	Unchanged,
	/// The balance moved; `delta` is `previous - new`
	Changed { previous: U256, delta: I256 },
}

/// Snapshots keyed by `(network, address)`.
///
/// Every mutation re-reads the stored height under the lock, so an older
/// result completing after a newer one can never overwrite it.
#[derive(Clone, Default)]
pub struct SnapshotStore {
	snapshots: Arc<Mutex<HashMap<(NetworkType, String), BalanceSnapshot>>>,
}

impl SnapshotStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn get(&self, network: NetworkType, address: &str) -> Option<BalanceSnapshot> {
		self.snapshots
			.lock()
			.await
			.get(&(network, address.to_string()))
			.copied()
	}

	/// Stores the first snapshot of a key. Returns `false` and keeps the
	/// existing snapshot if the key is already initialized.
	pub async fn initialize(
		&self,
		network: NetworkType,
		address: &str,
		snapshot: BalanceSnapshot,
	) -> bool {
		let mut snapshots = self.snapshots.lock().await;
		let key = (network, address.to_string());
		if snapshots.contains_key(&key) {
			return false;
		}
		snapshots.insert(key, snapshot);
		true
	}

	/// Height-gated compare-and-replace of a fetched balance.
	pub async fn apply(
		&self,
		network: NetworkType,
		address: &str,
		balance: U256,
		height: u64,
	) -> BalanceUpdate {
		let mut snapshots = self.snapshots.lock().await;

		let mut entry = match snapshots.entry((network, address.to_string())) {
			Entry::Vacant(entry) => {
				entry.insert(BalanceSnapshot { balance, height });
				return BalanceUpdate::Initialized;
			}
			Entry::Occupied(entry) => entry,
		};
		let stored = entry.get_mut();

		if height <= stored.height {
			return BalanceUpdate::Discarded {
				stored_height: stored.height,
			};
		}

		let previous = stored.balance;
		stored.balance = balance;
		stored.height = height;

		if previous == balance {
			BalanceUpdate::Unchanged
		} else {
			BalanceUpdate::Changed {
				previous,
				delta: signed_delta(previous, balance),
			}
		}
	}

	pub async fn len(&self) -> usize {
		self.snapshots.lock().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}
}

/// `previous - new` as a signed value, saturating beyond the `I256` range.
pub fn signed_delta(previous: U256, new: U256) -> I256 {
	let (sign, magnitude) = if previous >= new {
		(Sign::Positive, previous - new)
	} else {
		(Sign::Negative, new - previous)
	};

	I256::checked_from_sign_and_abs(sign, magnitude).unwrap_or(match sign {
		Sign::Positive => I256::MAX,
		Sign::Negative => I256::MIN,
	})
}
