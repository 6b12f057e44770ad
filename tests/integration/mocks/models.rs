//! Shared fixtures for the integration tests.

use std::sync::Arc;

use eventscan::{
	models::{AddressLock, Contract, NetworkType},
	services::event_bus::{EventBus, Subscription},
	utils::tests::builders::CollectingListener,
};

/// Creates a bus with one listener receiving every event.
pub fn create_test_bus() -> (Arc<EventBus>, Arc<CollectingListener>) {
	let bus = Arc::new(EventBus::new());
	let listener = Arc::new(CollectingListener::new("collector"));
	bus.subscribe(Subscription::All, listener.clone());
	(bus, listener)
}

pub fn create_test_lock(id: i64, network: NetworkType, address: &str) -> AddressLock {
	AddressLock {
		id,
		network,
		address: address.to_string(),
		locked_at: None,
	}
}

pub fn create_test_contract(id: i64, network: NetworkType, tx_hash: &str) -> Contract {
	Contract {
		id,
		network,
		address: None,
		tx_hash: Some(tx_hash.to_string()),
	}
}
