//! Block monitors and the pipeline dispatching blocks to them.
//!
//! Each monitor correlates one class of watched entity with the blocks of the
//! networks it accepts, fetches receipts for the matching transactions and
//! publishes derived events on the event bus.

use std::collections::HashMap;

use async_trait::async_trait;

use tracing::debug;

use crate::{
	models::{Contract, NetworkType, NewBlockEvent, Transaction, TransactionReceipt, WatchedEntity},
	repositories::WatchRegistry,
	services::blockchain::ReceiptFetcher,
	utils::metrics::FETCH_FAILURES,
};

mod contract_events;
mod eos_actions;
mod error;
mod lock;
mod pipeline;

pub use contract_events::ContractEventsMonitor;
pub use eos_actions::EosActionsMonitor;
pub use error::MonitorError;
pub use lock::LockMonitor;
pub use pipeline::MonitorPipeline;

/// A consumer of new blocks.
#[async_trait]
pub trait BlockMonitor: Send + Sync {
	fn name(&self) -> &'static str;

	/// Whether blocks of `network` are relevant to this monitor.
	fn accepts(&self, network: NetworkType) -> bool;

	/// Processes one block and returns the number of published events.
	///
	/// Per-entity and per-transaction failures are absorbed; only failures
	/// that make the whole block unprocessable are returned.
	async fn on_new_block(&self, event: &NewBlockEvent) -> Result<usize, MonitorError>;
}

pub(crate) fn entity_metadata(
	network: NetworkType,
	entity_id: i64,
	tx_hash: &str,
) -> Option<HashMap<String, String>> {
	Some(HashMap::from([
		("network".to_string(), network.to_string()),
		("entity_id".to_string(), entity_id.to_string()),
		("tx_hash".to_string(), tx_hash.to_string()),
	]))
}

/// Fetches the receipt of a matched transaction.
pub(crate) async fn fetch_receipt(
	fetcher: &dyn ReceiptFetcher,
	network: NetworkType,
	entity_id: i64,
	transaction: &Transaction,
) -> Result<TransactionReceipt, MonitorError> {
	fetcher.fetch(network, transaction).await.map_err(|e| {
		FETCH_FAILURES
			.with_label_values(&[network.slug(), "receipt"])
			.inc();
		MonitorError::fetch_error(
			"Failed to fetch transaction receipt",
			Some(Box::new(e)),
			entity_metadata(network, entity_id, &transaction.hash),
		)
	})
}

/// Looks up the contracts deployed or called by the block's transactions.
pub(crate) async fn find_contracts(
	registry: &dyn WatchRegistry,
	event: &NewBlockEvent,
) -> Result<Vec<Contract>, MonitorError> {
	let network = event.network_type;
	let hashes = event.block.transaction_hashes();
	if hashes.is_empty() {
		return Ok(Vec::new());
	}

	let entities = registry
		.find_by_tx_hashes(&hashes, network)
		.await
		.map_err(|e| {
			MonitorError::registry_error(
				"Failed to look up contracts by transaction hash",
				Some(Box::new(e)),
				Some(HashMap::from([
					("network".to_string(), network.to_string()),
					("block".to_string(), event.block.number.to_string()),
				])),
			)
		})?;

	Ok(entities
		.into_iter()
		.filter_map(|entity| match entity {
			WatchedEntity::Contract(contract) => Some(contract),
			other => {
				debug!(entity_id = other.id(), "Ignoring non-contract entity");
				None
			}
		})
		.collect())
}

/// Transactions of the block whose hash is the contract's tracked hash.
pub(crate) fn contract_transactions<'a>(
	event: &'a NewBlockEvent,
	contract: &Contract,
) -> Result<Vec<&'a Transaction>, MonitorError> {
	let tx_hash = contract.tx_hash.as_deref().unwrap_or_default();
	let transactions: Vec<_> = event
		.block
		.transactions
		.iter()
		.filter(|tx| tx.hash == tx_hash)
		.collect();

	if transactions.is_empty() {
		return Err(MonitorError::integrity_error(
			"Contract selected by tx hash, but the block has no such transaction",
			None,
			entity_metadata(event.network_type, contract.id, tx_hash),
		));
	}

	Ok(transactions)
}
