use std::sync::Arc;

use eventscan::{
	models::{DerivedEvent, NetworkType, NewBlockEvent},
	repositories::InMemoryWatchRegistry,
	services::monitor::{BlockMonitor, LockMonitor},
	utils::tests::builders::{BlockBuilder, ReceiptBuilder, TransactionBuilder},
};

use crate::integration::mocks::{create_test_bus, create_test_lock, MockReceiptFetcher};

fn block_sent_by(number: u64, sender: &str) -> NewBlockEvent {
	BlockBuilder::new()
		.network(NetworkType::RskMainnet)
		.number(number)
		.transaction(
			TransactionBuilder::new()
				.hash(&format!("0xtx{number}"))
				.input(sender)
				.build(),
		)
		.build_event()
}

#[tokio::test]
async fn test_registry_changes_apply_from_next_block() {
	let mut receipts = MockReceiptFetcher::new();
	receipts
		.expect_fetch()
		.returning(|_, tx| Ok(ReceiptBuilder::new().transaction_hash(&tx.hash).build()));

	let registry = Arc::new(InMemoryWatchRegistry::new());
	let (bus, listener) = create_test_bus();
	let monitor = LockMonitor::new(registry.clone(), Arc::new(receipts), bus);

	assert_eq!(monitor.on_new_block(&block_sent_by(1, "0xLocked")).await.unwrap(), 0);

	registry
		.register(create_test_lock(3, NetworkType::RskMainnet, "0xLOCKED"))
		.await;
	assert_eq!(monitor.on_new_block(&block_sent_by(2, "0xLocked")).await.unwrap(), 1);

	assert!(registry.remove(NetworkType::RskMainnet, 3).await);
	assert_eq!(monitor.on_new_block(&block_sent_by(3, "0xLocked")).await.unwrap(), 0);

	match listener.events().as_slice() {
		[DerivedEvent::TransactionUnlocked(unlocked)] => {
			assert_eq!(unlocked.lock.id, 3);
			assert_eq!(unlocked.transaction.hash, "0xtx2");
		}
		other => panic!("unexpected events {other:?}"),
	}
}
