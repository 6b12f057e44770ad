use std::{collections::HashSet, sync::Arc};

use eventscan::{
	models::{DerivedEvent, NetworkType, PaymentStatus, WatchedEntity},
	repositories::RepositoryError,
	services::{
		blockchain::BlockChainError,
		monitor::{BlockMonitor, LockMonitor, MonitorError},
	},
	utils::tests::builders::{BlockBuilder, ReceiptBuilder, TransactionBuilder},
};

use crate::integration::mocks::{
	create_test_bus, create_test_lock, MockReceiptFetcher, MockWatchRegistry,
};

fn receipt_fetcher_ok() -> MockReceiptFetcher {
	let mut receipts = MockReceiptFetcher::new();
	receipts.expect_fetch().returning(|_, tx| {
		Ok(ReceiptBuilder::new()
			.transaction_hash(&tx.hash)
			.status(tx.hash != "0xfailed")
			.build())
	});
	receipts
}

#[tokio::test]
async fn test_sent_from_locked_address_publishes_unlocked_event() {
	let network = NetworkType::RskMainnet;
	let mut registry = MockWatchRegistry::new();
	registry
		.expect_find_by_addresses()
		.withf(|net, addresses| {
			*net == NetworkType::RskMainnet
				&& addresses == &HashSet::from(["0xlocked".to_string(), "0xother".to_string()])
		})
		.times(1)
		.returning(|net, _| {
			Ok(vec![WatchedEntity::from(create_test_lock(
				1, net, "0xLOCKED",
			))])
		});

	let (bus, listener) = create_test_bus();
	let monitor = LockMonitor::new(Arc::new(registry), Arc::new(receipt_fetcher_ok()), bus);

	let event = BlockBuilder::new()
		.network(network)
		.number(100)
		.transaction(
			TransactionBuilder::new()
				.hash("0xok")
				.input("0xLocked")
				.output("0xdest")
				.build(),
		)
		.transaction(
			TransactionBuilder::new()
				.hash("0xfailed")
				.input("0xlocked")
				.build(),
		)
		.transaction(
			TransactionBuilder::new()
				.hash("0xincoming")
				.input("0xother")
				.output("0xlocked")
				.build(),
		)
		.build_event();

	let published = monitor.on_new_block(&event).await.unwrap();
	assert_eq!(published, 2);

	let events = listener.events();
	assert_eq!(events.len(), 2);
	let outcomes: Vec<_> = events
		.iter()
		.map(|event| match event {
			DerivedEvent::TransactionUnlocked(unlocked) => {
				assert_eq!(unlocked.lock.id, 1);
				(
					unlocked.transaction.hash.clone(),
					PaymentStatus::from_success(unlocked.receipt.success),
				)
			}
			other => panic!("unexpected event {other:?}"),
		})
		.collect();
	assert_eq!(
		outcomes,
		vec![
			("0xok".to_string(), PaymentStatus::Committed),
			("0xfailed".to_string(), PaymentStatus::Rejected),
		]
	);
}

#[tokio::test]
async fn test_unwatched_transactions_publish_nothing() {
	let mut registry = MockWatchRegistry::new();
	registry
		.expect_find_by_addresses()
		.returning(|_, _| Ok(vec![]));
	let mut receipts = MockReceiptFetcher::new();
	receipts.expect_fetch().never();

	let (bus, listener) = create_test_bus();
	let monitor = LockMonitor::new(Arc::new(registry), Arc::new(receipts), bus);

	let event = BlockBuilder::new()
		.transaction(TransactionBuilder::new().input("0xa").output("0xb").build())
		.build_event();

	assert_eq!(monitor.on_new_block(&event).await.unwrap(), 0);
	assert!(listener.is_empty());
}

#[tokio::test]
async fn test_block_without_senders_skips_registry() {
	let mut registry = MockWatchRegistry::new();
	registry.expect_find_by_addresses().never();

	let (bus, _) = create_test_bus();
	let monitor = LockMonitor::new(
		Arc::new(registry),
		Arc::new(MockReceiptFetcher::new()),
		bus,
	);

	let event = BlockBuilder::new()
		.transaction(TransactionBuilder::new().output("0xb").build())
		.build_event();

	assert_eq!(monitor.on_new_block(&event).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_receipt_fetch_does_not_stop_siblings() {
	let mut registry = MockWatchRegistry::new();
	registry.expect_find_by_addresses().returning(|net, _| {
		Ok(vec![
			create_test_lock(1, net, "0xa").into(),
			create_test_lock(2, net, "0xb").into(),
			create_test_lock(3, net, "0xc").into(),
		])
	});

	let mut receipts = MockReceiptFetcher::new();
	receipts.expect_fetch().returning(|_, tx| {
		if tx.hash == "0xtx-b" {
			Err(BlockChainError::request_error("timeout", None, None))
		} else {
			Ok(ReceiptBuilder::new().transaction_hash(&tx.hash).build())
		}
	});

	let (bus, listener) = create_test_bus();
	let monitor = LockMonitor::new(Arc::new(registry), Arc::new(receipts), bus);

	let event = BlockBuilder::new()
		.transaction(TransactionBuilder::new().hash("0xtx-a").input("0xa").build())
		.transaction(TransactionBuilder::new().hash("0xtx-b").input("0xb").build())
		.transaction(TransactionBuilder::new().hash("0xtx-c").input("0xc").build())
		.build_event();

	assert_eq!(monitor.on_new_block(&event).await.unwrap(), 2);

	let ids: Vec<_> = listener
		.events()
		.into_iter()
		.map(|event| match event {
			DerivedEvent::TransactionUnlocked(unlocked) => unlocked.lock.id,
			other => panic!("unexpected event {other:?}"),
		})
		.collect();
	assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_lock_not_first_input_is_ignored() {
	let mut registry = MockWatchRegistry::new();
	registry
		.expect_find_by_addresses()
		.returning(|net, _| Ok(vec![create_test_lock(9, net, "0xsecond").into()]));
	let mut receipts = MockReceiptFetcher::new();
	receipts.expect_fetch().never();

	let (bus, listener) = create_test_bus();
	let monitor = LockMonitor::new(Arc::new(registry), Arc::new(receipts), bus);

	let event = BlockBuilder::new()
		.network(NetworkType::BtcMainnet)
		.transaction(
			TransactionBuilder::new()
				.input("0xfirst")
				.input("0xsecond")
				.build(),
		)
		.build_event();

	assert_eq!(monitor.on_new_block(&event).await.unwrap(), 0);
	assert!(listener.is_empty());
}

#[tokio::test]
async fn test_lock_missing_from_block_is_skipped() {
	let mut registry = MockWatchRegistry::new();
	registry.expect_find_by_addresses().returning(|net, _| {
		Ok(vec![
			create_test_lock(1, net, "0xnot-in-block").into(),
			create_test_lock(2, net, "0xa").into(),
		])
	});

	let (bus, listener) = create_test_bus();
	let monitor = LockMonitor::new(Arc::new(registry), Arc::new(receipt_fetcher_ok()), bus);

	let event = BlockBuilder::new()
		.transaction(TransactionBuilder::new().input("0xa").build())
		.build_event();

	assert_eq!(monitor.on_new_block(&event).await.unwrap(), 1);
	assert_eq!(listener.len(), 1);
}

#[tokio::test]
async fn test_registry_failure_skips_block() {
	let mut registry = MockWatchRegistry::new();
	registry
		.expect_find_by_addresses()
		.returning(|_, _| Err(RepositoryError::internal_error("db down", None, None)));

	let (bus, listener) = create_test_bus();
	let monitor = LockMonitor::new(
		Arc::new(registry),
		Arc::new(MockReceiptFetcher::new()),
		bus,
	);

	let event = BlockBuilder::new()
		.transaction(TransactionBuilder::new().input("0xa").build())
		.build_event();

	let result = monitor.on_new_block(&event).await;
	assert!(matches!(result, Err(MonitorError::RegistryError(_))));
	assert!(listener.is_empty());
}

#[test]
fn test_waves_is_not_accepted() {
	let (bus, _) = create_test_bus();
	let monitor = LockMonitor::new(
		Arc::new(MockWatchRegistry::new()),
		Arc::new(MockReceiptFetcher::new()),
		bus,
	);

	assert!(!monitor.accepts(NetworkType::WavesMainnet));
	assert!(monitor.accepts(NetworkType::BtcTestnet3));
	assert!(monitor.accepts(NetworkType::EosMainnet));
}
