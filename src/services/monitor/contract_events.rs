//! Contract events monitor: forwards the decoded log of every transaction
//! that deployed or called a watched contract.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
	models::{
		Contract, ContractEventsEvent, NetworkProviderType, NetworkType, NewBlockEvent,
	},
	repositories::WatchRegistry,
	services::{
		blockchain::ReceiptFetcher,
		event_bus::EventBus,
		monitor::{
			contract_transactions, fetch_receipt, find_contracts, BlockMonitor, MonitorError,
		},
	},
};

/// Publishes one `ContractEvents` event per matched transaction, wrapping the
/// receipt's full log list. EOS contracts are left to [`super::EosActionsMonitor`].
pub struct ContractEventsMonitor {
	registry: Arc<dyn WatchRegistry>,
	receipts: Arc<dyn ReceiptFetcher>,
	bus: Arc<EventBus>,
}

impl ContractEventsMonitor {
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

	async fn process_contract(
		&self,
		event: &NewBlockEvent,
		contract: &Contract,
	) -> Result<usize, MonitorError> {
		let network = event.network_type;
		let transactions = contract_transactions(event, contract)?;

		let mut published = 0;
		for transaction in transactions {
			let receipt =
				match fetch_receipt(self.receipts.as_ref(), network, contract.id, transaction).await
				{
					Ok(receipt) => receipt,
					// Logged when constructed
					Err(_) => continue,
				};

			self.bus
				.publish(
					ContractEventsEvent {
						network,
						contract: contract.clone(),
						events: receipt.logs.clone(),
						transaction: transaction.clone(),
						receipt,
						block: event.block.summary(),
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
impl BlockMonitor for ContractEventsMonitor {
	fn name(&self) -> &'static str {
		"contract_events"
	}

	fn accepts(&self, network: NetworkType) -> bool {
		network.provider() != NetworkProviderType::Eos
	}

	async fn on_new_block(&self, event: &NewBlockEvent) -> Result<usize, MonitorError> {
		let mut published = 0;
		for contract in find_contracts(self.registry.as_ref(), event).await? {
			if let Ok(count) = self.process_contract(event, &contract).await {
				published += count;
			}
		}

		Ok(published)
	}
}
