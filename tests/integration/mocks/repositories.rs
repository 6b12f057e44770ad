//! Mock implementations of repository traits.
//!
//! - [`MockWatchRegistry`] - Mock implementation of the watch registry
//! - [`MockNetworkCatalog`] - Mock implementation of the network catalog
//!
//! These mocks allow testing registry-dependent functionality without a
//! backing store.

use std::collections::HashSet;

use async_trait::async_trait;
use eventscan::{
	models::{NetworkType, WatchedEntity},
	repositories::{NetworkCatalog, RepositoryError, WatchRegistry},
};
use mockall::mock;

mock! {
	/// Mock implementation of the watch registry.
	pub WatchRegistry {}

	#[async_trait]
	impl WatchRegistry for WatchRegistry {
		async fn find_by_tx_hashes(
			&self,
			hashes: &HashSet<String>,
			network: NetworkType,
		) -> Result<Vec<WatchedEntity>, RepositoryError>;

		async fn find_by_addresses(
			&self,
			network: NetworkType,
			addresses: &HashSet<String>,
		) -> Result<Vec<WatchedEntity>, RepositoryError>;
	}
}

mock! {
	/// Mock implementation of the network catalog.
	pub NetworkCatalog {}

	impl NetworkCatalog for NetworkCatalog {
		fn available_networks(&self) -> HashSet<NetworkType>;
	}
}
