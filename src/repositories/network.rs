//! Network configuration repository implementation.
//!
//! This module provides storage and retrieval of network configurations and
//! exposes them as the [`NetworkCatalog`] the rest of the crate queries to learn
//! which networks are available.

#![allow(clippy::result_large_err)]

use std::{
	collections::{HashMap, HashSet},
	path::Path,
};

use async_trait::async_trait;

use crate::{
	models::{ConfigLoader, NetworkConfig, NetworkType},
	repositories::error::RepositoryError,
};

/// Which networks are configured and active.
pub trait NetworkCatalog: Send + Sync {
	fn available_networks(&self) -> HashSet<NetworkType>;

	fn is_available(&self, network: NetworkType) -> bool {
		self.available_networks().contains(&network)
	}
}

/// Repository for storing and retrieving network configurations
#[derive(Clone)]
pub struct NetworkRepository {
	/// Map of config file names to their configurations
	pub networks: HashMap<String, NetworkConfig>,
}

impl NetworkRepository {
	/// Create a new network repository from the given path
	///
	/// Loads all network configurations from JSON files in the specified directory
	/// (or default config directory if None is provided).
	pub async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let networks = Self::load_all(path).await?;
		Ok(NetworkRepository { networks })
	}

	/// Create a repository from already built configurations, keyed by slug.
	pub fn from_configs(configs: impl IntoIterator<Item = NetworkConfig>) -> Self {
		let networks = configs
			.into_iter()
			.map(|config| (config.network_type.slug().to_string(), config))
			.collect();
		NetworkRepository { networks }
	}
}

/// Interface for network repository implementations
///
/// This trait defines the standard operations that any network repository must support,
/// allowing for different storage backends while maintaining a consistent interface.
#[async_trait]
pub trait NetworkRepositoryTrait: Clone {
	/// Create a new repository instance
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	/// Load all network configurations from the given path
	///
	/// If no path is provided, uses the default config directory.
	async fn load_all(
		path: Option<&Path>,
	) -> Result<HashMap<String, NetworkConfig>, RepositoryError>;

	/// Get a specific network by its config name
	fn get(&self, name: &str) -> Option<NetworkConfig>;

	/// Get the configuration of a network type
	fn get_by_type(&self, network: NetworkType) -> Option<NetworkConfig>;

	/// Get all networks
	///
	/// Returns a copy of the network map to prevent external mutation.
	fn get_all(&self) -> HashMap<String, NetworkConfig>;
}

#[async_trait]
impl NetworkRepositoryTrait for NetworkRepository {
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		NetworkRepository::new(path).await
	}

	async fn load_all(
		path: Option<&Path>,
	) -> Result<HashMap<String, NetworkConfig>, RepositoryError> {
		NetworkConfig::load_all(path).await.map_err(|e| {
			RepositoryError::load_error(
				"Failed to load networks",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.map_or_else(|| "default".to_string(), |p| p.display().to_string()),
				)])),
			)
		})
	}

	fn get(&self, name: &str) -> Option<NetworkConfig> {
		self.networks.get(name).cloned()
	}

	fn get_by_type(&self, network: NetworkType) -> Option<NetworkConfig> {
		self.networks
			.values()
			.find(|config| config.network_type == network)
			.cloned()
	}

	fn get_all(&self) -> HashMap<String, NetworkConfig> {
		self.networks.clone()
	}
}

/// Service layer for network repository operations
///
/// This type provides a higher-level interface for working with network configurations,
/// handling repository initialization and access through a trait-based interface.
#[derive(Clone)]
pub struct NetworkService<T: NetworkRepositoryTrait> {
	repository: T,
}

impl<T: NetworkRepositoryTrait> NetworkService<T> {
	/// Create a new network service with the default repository implementation
	pub async fn new(
		path: Option<&Path>,
	) -> Result<NetworkService<NetworkRepository>, RepositoryError> {
		let repository = NetworkRepository::new(path).await?;
		Ok(NetworkService { repository })
	}

	/// Create a new network service with a custom repository implementation
	pub fn new_with_repository(repository: T) -> Result<Self, RepositoryError> {
		Ok(NetworkService { repository })
	}

	/// Get a specific network by its config name
	pub fn get(&self, name: &str) -> Option<NetworkConfig> {
		self.repository.get(name)
	}

	/// Get the configuration of a network type
	pub fn get_by_type(&self, network: NetworkType) -> Option<NetworkConfig> {
		self.repository.get_by_type(network)
	}

	/// Get all networks
	pub fn get_all(&self) -> HashMap<String, NetworkConfig> {
		self.repository.get_all()
	}
}

impl<T: NetworkRepositoryTrait + Send + Sync> NetworkCatalog for NetworkService<T> {
	fn available_networks(&self) -> HashSet<NetworkType> {
		self.repository
			.get_all()
			.values()
			.map(|config| config.network_type)
			.collect()
	}
}
