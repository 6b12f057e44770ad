use std::sync::Arc;

use eventscan::{
	models::{ContractEvent, DerivedEvent, NetworkType, PaymentStatus},
	services::{
		blockchain::BlockChainError,
		monitor::{BlockMonitor, EosActionsMonitor},
	},
	utils::tests::builders::{BlockBuilder, ReceiptBuilder, TransactionBuilder},
};

use crate::integration::mocks::{
	create_test_bus, create_test_contract, MockReceiptFetcher, MockWatchRegistry,
};

fn creation_receipt(hash: &str, success: bool) -> eventscan::models::TransactionReceipt {
	ReceiptBuilder::new()
		.transaction_hash(hash)
		.status(success)
		.log(ContractEvent::AccountCreated {
			address: "eosio".to_string(),
			created: "alice".to_string(),
		})
		.log(ContractEvent::Transfer {
			address: "eosio.token".to_string(),
			from: "alice".to_string(),
			to: "bob".to_string(),
			value: alloy::primitives::U256::from(1),
		})
		.log(ContractEvent::TokenCreated {
			address: "tokenacc".to_string(),
			issuer: "alice".to_string(),
			symbol: "ABC".to_string(),
		})
		.build()
}

async fn run_with_status(success: bool) -> Vec<DerivedEvent> {
	let mut registry = MockWatchRegistry::new();
	registry
		.expect_find_by_tx_hashes()
		.returning(|_, network| Ok(vec![create_test_contract(3, network, "eostx").into()]));
	let mut receipts = MockReceiptFetcher::new();
	receipts
		.expect_fetch()
		.returning(move |_, tx| Ok(creation_receipt(&tx.hash, success)));

	let (bus, listener) = create_test_bus();
	let monitor = EosActionsMonitor::new(Arc::new(registry), Arc::new(receipts), bus);

	let event = BlockBuilder::new()
		.network(NetworkType::EosMainnet)
		.transaction(TransactionBuilder::new().hash("eostx").input("alice").build())
		.build_event();

	assert_eq!(monitor.on_new_block(&event).await.unwrap(), 2);
	listener.events()
}

#[tokio::test]
async fn test_creation_logs_become_committed_notifications() {
	let events = run_with_status(true).await;
	assert_eq!(events.len(), 2);

	match &events[0] {
		DerivedEvent::AccountCreatedNotify(notify) => {
			assert_eq!(notify.contract_id, 3);
			assert_eq!(notify.created, "alice");
			assert_eq!(notify.tx_hash, "eostx");
			assert_eq!(notify.status, PaymentStatus::Committed);
		}
		other => panic!("unexpected event {other:?}"),
	}
	match &events[1] {
		DerivedEvent::TokenCreatedNotify(notify) => {
			assert_eq!(notify.token_address, "tokenacc");
			assert_eq!(notify.status, PaymentStatus::Committed);
		}
		other => panic!("unexpected event {other:?}"),
	}
}

#[tokio::test]
async fn test_failed_transaction_is_rejected() {
	let events = run_with_status(false).await;
	assert_eq!(events.len(), 2);
	for event in events {
		let status = match event {
			DerivedEvent::AccountCreatedNotify(notify) => notify.status,
			DerivedEvent::TokenCreatedNotify(notify) => notify.status,
			other => panic!("unexpected event {other:?}"),
		};
		assert_eq!(status, PaymentStatus::Rejected);
	}
}

#[tokio::test]
async fn test_receipt_failure_publishes_nothing() {
	let mut registry = MockWatchRegistry::new();
	registry
		.expect_find_by_tx_hashes()
		.returning(|_, network| Ok(vec![create_test_contract(3, network, "eostx").into()]));
	let mut receipts = MockReceiptFetcher::new();
	receipts
		.expect_fetch()
		.returning(|_, _| Err(BlockChainError::receipt_not_found("no receipt", None, None)));

	let (bus, listener) = create_test_bus();
	let monitor = EosActionsMonitor::new(Arc::new(registry), Arc::new(receipts), bus);

	let event = BlockBuilder::new()
		.network(NetworkType::EosTestnet)
		.transaction(TransactionBuilder::new().hash("eostx").build())
		.build_event();

	assert_eq!(monitor.on_new_block(&event).await.unwrap(), 0);
	assert!(listener.is_empty());
}

#[test]
fn test_only_eos_is_accepted() {
	let (bus, _) = create_test_bus();
	let monitor = EosActionsMonitor::new(
		Arc::new(MockWatchRegistry::new()),
		Arc::new(MockReceiptFetcher::new()),
		bus,
	);

	assert!(monitor.accepts(NetworkType::EosMainnet));
	assert!(monitor.accepts(NetworkType::EosTestnet));
	assert!(!monitor.accepts(NetworkType::EthereumMainnet));
}
