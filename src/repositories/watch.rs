//! Watch registry: lookup of the entities the operator registered interest in.
//!
//! The durable store behind the registry lives outside this crate. Monitors
//! only see the [`WatchRegistry`] trait; [`InMemoryWatchRegistry`] backs tests
//! and embedders that keep their watch list in memory.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
	models::{NetworkType, WatchedEntity},
	repositories::error::RepositoryError,
};

/// Bulk lookups of watched entities scoped to one network.
#[async_trait]
pub trait WatchRegistry: Send + Sync {
	/// Entities whose tracked transaction hash is one of `hashes`.
	async fn find_by_tx_hashes(
		&self,
		hashes: &HashSet<String>,
		network: NetworkType,
	) -> Result<Vec<WatchedEntity>, RepositoryError>;

	/// Entities whose tracked address is one of `addresses`.
	///
	/// `addresses` are block index keys, so matching is case-insensitive on
	/// networks with case-insensitive addresses.
	async fn find_by_addresses(
		&self,
		network: NetworkType,
		addresses: &HashSet<String>,
	) -> Result<Vec<WatchedEntity>, RepositoryError>;
}

/// Registry kept in process memory.
#[derive(Default)]
pub struct InMemoryWatchRegistry {
	entities: RwLock<HashMap<NetworkType, Vec<WatchedEntity>>>,
}

impl InMemoryWatchRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an entity, replacing any entity with the same id on the same network.
	pub async fn register(&self, entity: impl Into<WatchedEntity>) {
		let entity = entity.into();
		let mut entities = self.entities.write().await;
		let watched = entities.entry(entity.network()).or_default();
		watched.retain(|existing| existing.id() != entity.id());
		watched.push(entity);
	}

	/// Removes an entity; returns whether it was registered.
	pub async fn remove(&self, network: NetworkType, id: i64) -> bool {
		let mut entities = self.entities.write().await;
		match entities.get_mut(&network) {
			Some(watched) => {
				let before = watched.len();
				watched.retain(|existing| existing.id() != id);
				watched.len() != before
			}
			None => false,
		}
	}

	pub async fn len(&self) -> usize {
		self.entities.read().await.values().map(Vec::len).sum()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}
}

#[async_trait]
impl WatchRegistry for InMemoryWatchRegistry {
	async fn find_by_tx_hashes(
		&self,
		hashes: &HashSet<String>,
		network: NetworkType,
	) -> Result<Vec<WatchedEntity>, RepositoryError> {
		let entities = self.entities.read().await;
		Ok(entities
			.get(&network)
			.map(|watched| {
				watched
					.iter()
					.filter(|entity| {
						entity
							.tx_hash()
							.map(|hash| hashes.contains(hash))
							.unwrap_or(false)
					})
					.cloned()
					.collect()
			})
			.unwrap_or_default())
	}

	async fn find_by_addresses(
		&self,
		network: NetworkType,
		addresses: &HashSet<String>,
	) -> Result<Vec<WatchedEntity>, RepositoryError> {
		let entities = self.entities.read().await;
		Ok(entities
			.get(&network)
			.map(|watched| {
				watched
					.iter()
					.filter(|entity| {
						entity
							.address()
							.map(|address| addresses.contains(&network.normalize_address(address)))
							.unwrap_or(false)
					})
					.cloned()
					.collect()
			})
			.unwrap_or_default())
	}
}
