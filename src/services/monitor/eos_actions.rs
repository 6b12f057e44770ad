//! EOS actions monitor: turns account and token creation logs of watched EOS
//! contracts into external notifications.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
	models::{
		AccountCreatedNotify, Contract, ContractEvent, DerivedEvent, NetworkProviderType,
		NetworkType, NewBlockEvent, PaymentStatus, TokenCreatedNotify,
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

pub struct EosActionsMonitor {
	registry: Arc<dyn WatchRegistry>,
	receipts: Arc<dyn ReceiptFetcher>,
	bus: Arc<EventBus>,
}

impl EosActionsMonitor {
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

			let status = PaymentStatus::from_success(receipt.success);
			for log in &receipt.logs {
				let notify: DerivedEvent = match log {
					ContractEvent::AccountCreated { created, .. } => AccountCreatedNotify {
						network,
						contract_id: contract.id,
						status,
						tx_hash: transaction.hash.clone(),
						created: created.clone(),
					}
					.into(),
					ContractEvent::TokenCreated { address, .. } => TokenCreatedNotify {
						network,
						contract_id: contract.id,
						status,
						tx_hash: transaction.hash.clone(),
						token_address: address.clone(),
					}
					.into(),
					ContractEvent::ContractKilled { .. } | ContractEvent::Transfer { .. } => continue,
				};
				self.bus.publish(notify).await;
				published += 1;
			}
		}

		Ok(published)
	}
}

#[async_trait]
impl BlockMonitor for EosActionsMonitor {
	fn name(&self) -> &'static str {
		"eos_actions"
	}

	fn accepts(&self, network: NetworkType) -> bool {
		network.provider() == NetworkProviderType::Eos
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
