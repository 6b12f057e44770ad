use std::{
	sync::Arc,
	time::Duration,
};

use alloy::primitives::{I256, U256};
use async_trait::async_trait;
use eventscan::{
	models::{CryptoCurrency, DerivedEvent, NetworkType, NewBlockEvent},
	services::{
		balance::{BalanceDeltaTracker, BalanceSnapshot, GatewayAddress},
		blockchain::{BalanceFetcher, BlockChainError},
		monitor::BlockMonitor,
	},
	utils::tests::builders::{BlockBuilder, TransactionBuilder},
};
use mockall::Sequence;
use tokio::sync::Notify;

use crate::integration::mocks::{create_test_bus, MockBalanceFetcher};

const GATEWAY: &str = "0xgateway";

fn gateway() -> GatewayAddress {
	GatewayAddress::new(NetworkType::EthereumMainnet, GATEWAY, CryptoCurrency::Eth)
}

fn qualifying_block(number: u64) -> NewBlockEvent {
	BlockBuilder::new()
		.number(number)
		.transaction(
			TransactionBuilder::new()
				.hash(&format!("0xtx{}", number))
				.input(GATEWAY)
				.output("0xuser")
				.build(),
		)
		.build_event()
}

fn expect_balances(fetcher: &mut MockBalanceFetcher, balances: &[(u64, u64)]) {
	let mut sequence = Sequence::new();
	for (height, balance) in balances.iter().copied() {
		fetcher
			.expect_get_balance()
			.withf(move |network, address, h| {
				*network == NetworkType::EthereumMainnet && address == GATEWAY && *h == height
			})
			.times(1)
			.in_sequence(&mut sequence)
			.returning(move |_, _, _| Ok(U256::from(balance)));
	}
}

#[tokio::test]
async fn test_balance_change_publishes_delta() {
	let mut fetcher = MockBalanceFetcher::new();
	expect_balances(&mut fetcher, &[(100, 100), (101, 80), (102, 80)]);

	let (bus, listener) = create_test_bus();
	let tracker = BalanceDeltaTracker::new(vec![gateway()], Arc::new(fetcher), bus);

	tracker.on_new_block(&qualifying_block(100)).await.unwrap();
	tracker.wait_idle().await;
	assert!(listener.is_empty());
	assert_eq!(
		tracker.store().get(NetworkType::EthereumMainnet, GATEWAY).await,
		Some(BalanceSnapshot {
			balance: U256::from(100),
			height: 100,
		})
	);

	tracker.on_new_block(&qualifying_block(101)).await.unwrap();
	tracker.wait_idle().await;

	let events = listener.events();
	assert_eq!(events.len(), 1);
	match &events[0] {
		DerivedEvent::FgwBalanceChanged(changed) => {
			assert_eq!(changed.address, GATEWAY);
			assert_eq!(changed.actual_balance, U256::from(80));
			assert_eq!(changed.delta, I256::try_from(20i64).unwrap());
			assert_eq!(changed.currency, CryptoCurrency::Eth);
			assert_eq!(changed.block_number, 101);
		}
		other => panic!("unexpected event {other:?}"),
	}

	tracker.on_new_block(&qualifying_block(102)).await.unwrap();
	tracker.wait_idle().await;
	assert_eq!(listener.len(), 1);
	assert_eq!(
		tracker.store().get(NetworkType::EthereumMainnet, GATEWAY).await,
		Some(BalanceSnapshot {
			balance: U256::from(80),
			height: 102,
		})
	);
}

#[tokio::test]
async fn test_block_not_touching_gateway_fetches_nothing() {
	let mut fetcher = MockBalanceFetcher::new();
	fetcher.expect_get_balance().never();

	let (bus, listener) = create_test_bus();
	let tracker = BalanceDeltaTracker::new(vec![gateway()], Arc::new(fetcher), bus);

	let event = BlockBuilder::new()
		.transaction(TransactionBuilder::new().input("0xa").output("0xb").build())
		.build_event();
	tracker.on_new_block(&event).await.unwrap();
	tracker.wait_idle().await;

	assert!(listener.is_empty());
	assert!(tracker.store().is_empty().await);
}

#[tokio::test]
async fn test_failed_bootstrap_is_retried_on_next_block() {
	let mut fetcher = MockBalanceFetcher::new();
	let mut sequence = Sequence::new();
	fetcher
		.expect_get_balance()
		.times(1)
		.in_sequence(&mut sequence)
		.returning(|_, _, _| Err(BlockChainError::connection_error("node down", None, None)));
	fetcher
		.expect_get_balance()
		.times(1)
		.in_sequence(&mut sequence)
		.returning(|_, _, _| Ok(U256::from(50)));

	let (bus, listener) = create_test_bus();
	let tracker = BalanceDeltaTracker::new(vec![gateway()], Arc::new(fetcher), bus);

	tracker.on_new_block(&qualifying_block(10)).await.unwrap();
	assert!(tracker.store().is_empty().await);

	tracker.on_new_block(&qualifying_block(11)).await.unwrap();
	tracker.wait_idle().await;

	assert!(listener.is_empty());
	assert_eq!(
		tracker.store().get(NetworkType::EthereumMainnet, GATEWAY).await,
		Some(BalanceSnapshot {
			balance: U256::from(50),
			height: 11,
		})
	);
}

#[tokio::test]
async fn test_gateway_match_is_case_insensitive_on_rsk() {
	let mut fetcher = MockBalanceFetcher::new();
	fetcher
		.expect_get_balance()
		.withf(|_, address, _| address == "0xabcdef")
		.times(1)
		.returning(|_, _, _| Ok(U256::from(1)));

	let (bus, _) = create_test_bus();
	let tracker = BalanceDeltaTracker::new(
		vec![GatewayAddress::new(
			NetworkType::RskMainnet,
			"0xABCDEF",
			CryptoCurrency::Rsk,
		)],
		Arc::new(fetcher),
		bus,
	);

	let event = BlockBuilder::new()
		.network(NetworkType::RskMainnet)
		.transaction(TransactionBuilder::new().input("0xuser").output("0xAbCdEf").build())
		.build_event();
	tracker.on_new_block(&event).await.unwrap();

	assert!(tracker.accepts(NetworkType::RskMainnet));
	assert!(!tracker.accepts(NetworkType::EthereumMainnet));
	assert_eq!(tracker.store().len().await, 1);
}

/// Fetcher whose result for one height is held back until released.
struct GatedFetcher {
	gated_height: u64,
	gate: Arc<Notify>,
}

#[async_trait]
impl BalanceFetcher for GatedFetcher {
	async fn get_balance(
		&self,
		_network: NetworkType,
		_address: &str,
		height: u64,
	) -> Result<U256, BlockChainError> {
		match height {
			100 => Ok(U256::from(100)),
			h if h == self.gated_height => {
				self.gate.notified().await;
				Ok(U256::from(90))
			}
			_ => Ok(U256::from(70)),
		}
	}
}

#[tokio::test]
async fn test_late_result_for_older_height_is_discarded() {
	let gate = Arc::new(Notify::new());
	let fetcher = GatedFetcher {
		gated_height: 105,
		gate: gate.clone(),
	};

	let (bus, listener) = create_test_bus();
	let tracker = BalanceDeltaTracker::new(vec![gateway()], Arc::new(fetcher), bus);

	tracker.on_new_block(&qualifying_block(100)).await.unwrap();
	tracker.on_new_block(&qualifying_block(105)).await.unwrap();
	tracker.on_new_block(&qualifying_block(110)).await.unwrap();

	tokio::time::timeout(Duration::from_secs(5), async {
		loop {
			let snapshot = tracker
				.store()
				.get(NetworkType::EthereumMainnet, GATEWAY)
				.await;
			if snapshot.map(|s| s.height) == Some(110) {
				break;
			}
			tokio::time::sleep(Duration::from_millis(5)).await;
		}
	})
	.await
	.expect("continuation for block 110 did not complete");

	gate.notify_one();
	tracker.wait_idle().await;

	let events = listener.events();
	assert_eq!(events.len(), 1);
	match &events[0] {
		DerivedEvent::FgwBalanceChanged(changed) => {
			assert_eq!(changed.block_number, 110);
			assert_eq!(changed.delta, I256::try_from(30i64).unwrap());
		}
		other => panic!("unexpected event {other:?}"),
	}
	assert_eq!(
		tracker.store().get(NetworkType::EthereumMainnet, GATEWAY).await,
		Some(BalanceSnapshot {
			balance: U256::from(70),
			height: 110,
		})
	);
}
