//! Lock monitor: reports transactions sent from locked addresses.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tracing::debug;

use crate::{
	models::{
		AddressLock, NetworkProviderType, NetworkType, NewBlockEvent, TransactionUnlockedEvent,
		WatchedEntity,
	},
	repositories::WatchRegistry,
	services::{
		blockchain::ReceiptFetcher,
		event_bus::EventBus,
		monitor::{fetch_receipt, BlockMonitor, MonitorError},
	},
};

/// Publishes a `TransactionUnlocked` event for every transaction whose first
/// input is a locked address.
pub struct LockMonitor {
	registry: Arc<dyn WatchRegistry>,
	receipts: Arc<dyn ReceiptFetcher>,
	bus: Arc<EventBus>,
}

impl LockMonitor {
	pub fn new(
		registry: Arc<dyn WatchRegistry>,
		receipts: Arc<dyn ReceiptFetcher>,
		bus: Arc<EventBus>,
	) -> Self {
		Self {
			registry,
			receipts,
			bus,
		}
	}

	async fn process_lock(
		&self,
		event: &NewBlockEvent,
		lock: &AddressLock,
	) -> Result<usize, MonitorError> {
		let network = event.network_type;
		let key = network.normalize_address(&lock.address);
		let transactions = event
			.block
			.transactions_by_address()
			.get(&key)
			.ok_or_else(|| {
				MonitorError::integrity_error(
					"Address lock selected by address, but the block has no transaction for it",
					None,
					Some(HashMap::from([
						("network".to_string(), network.to_string()),
						("entity_id".to_string(), lock.id.to_string()),
						("address".to_string(), lock.address.clone()),
						("block".to_string(), event.block.number.to_string()),
					])),
				)
			})?;

		let mut published = 0;
		for transaction in transactions.iter().filter(|tx| tx.is_sent_by(&lock.address)) {
			let receipt =
				match fetch_receipt(self.receipts.as_ref(), network, lock.id, transaction).await {
					Ok(receipt) => receipt,
					// Logged when constructed
					Err(_) => continue,
				};

			self.bus
				.publish(
					TransactionUnlockedEvent {
						network,
						lock: lock.clone(),
						transaction: transaction.clone(),
						receipt,
					}
					.into(),
				)
				.await;
			published += 1;
		}

		Ok(published)
	}
}

#[async_trait]
impl BlockMonitor for LockMonitor {
	fn name(&self) -> &'static str {
		"lock"
	}

	fn accepts(&self, network: NetworkType) -> bool {
		network.provider() != NetworkProviderType::Waves
	}

	async fn on_new_block(&self, event: &NewBlockEvent) -> Result<usize, MonitorError> {
		let network = event.network_type;
		let senders = event.block.sender_addresses();
		if senders.is_empty() {
			return Ok(0);
		}

		let entities = self
			.registry
			.find_by_addresses(network, &senders)
			.await
			.map_err(|e| {
				MonitorError::registry_error(
					"Failed to look up address locks",
					Some(Box::new(e)),
					Some(HashMap::from([
						("network".to_string(), network.to_string()),
						("block".to_string(), event.block.number.to_string()),
					])),
				)
			})?;

		let mut published = 0;
		for entity in entities {
			let lock = match entity {
				WatchedEntity::AddressLock(lock) => lock,
				other => {
					debug!(entity_id = other.id(), "Ignoring non-lock entity");
					continue;
				}
			};

			if let Ok(count) = self.process_lock(event, &lock).await {
				published += count;
			}
		}

		Ok(published)
	}
}
