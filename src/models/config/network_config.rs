//! Network configuration loading and validation.
//!
//! This module implements the ConfigLoader trait for network configurations,
//! allowing network definitions to be loaded from JSON files.

use async_trait::async_trait;
use std::{
	collections::{HashMap, HashSet},
	path::Path,
};

use crate::{
	models::{config::error::ConfigError, ConfigLoader, NetworkConfig},
	utils::constants::{DEFAULT_CONFIG_DIR, NETWORKS_SUBDIR},
};

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

#[async_trait]
impl ConfigLoader for NetworkConfig {
	/// Load all network configurations from a directory
	///
	/// Reads and parses all JSON files in the specified directory (or
	/// `config/networks`) as network configurations. Any invalid file fails the
	/// whole load.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let default_dir = Path::new(DEFAULT_CONFIG_DIR).join(NETWORKS_SUBDIR);
		let network_dir = path.unwrap_or(default_dir.as_path());
		let mut pairs = Vec::new();

		if !network_dir.exists() {
			return Err(ConfigError::file_error(
				"networks directory not found",
				None,
				path_metadata(network_dir),
			));
		}

		let entries = std::fs::read_dir(network_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read networks directory: {}", e),
				Some(Box::new(e)),
				path_metadata(network_dir),
			)
		})?;

		let mut paths = Vec::new();
		for entry in entries {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					path_metadata(network_dir),
				)
			})?;
			paths.push(entry.path());
		}
		// Stable load order for duplicate reporting
		paths.sort();

		for path in paths {
			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			let network = Self::load_from_path(&path).await?;

			let existing: Vec<&NetworkConfig> = pairs.iter().map(|(_, network)| network).collect();
			Self::validate_uniqueness(&existing, &network, &path.display().to_string())?;

			pairs.push((name, network));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load a network configuration from a specific file
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open network config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;
		let mut config: NetworkConfig = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse network config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		config.gateway_addresses = config
			.gateway_addresses
			.iter()
			.map(|address| address.trim().to_string())
			.collect();

		config.validate()?;

		Ok(config)
	}

	/// Validate the network configuration
	///
	/// Ensures that:
	/// - The network has a name
	/// - Explorer templates contain a `{}` placeholder
	/// - Liveness thresholds are positive
	/// - Gateway addresses are neither blank nor repeated
	fn validate(&self) -> Result<(), ConfigError> {
		if self.name.trim().is_empty() {
			return Err(ConfigError::validation_error(
				"Network name is required",
				None,
				None,
			));
		}

		if let Some(explorer) = &self.explorer {
			for (field, template) in [
				("block_url", &explorer.block_url),
				("tx_url", &explorer.tx_url),
				("address_url", &explorer.address_url),
			] {
				if !template.contains("{}") {
					return Err(ConfigError::validation_error(
						format!("Explorer {} must contain a {{}} placeholder", field),
						None,
						Some(HashMap::from([("template".to_string(), template.clone())])),
					));
				}
			}
		}

		if let Some(liveness) = &self.liveness {
			if liveness.block_stuck_after_secs == 0 {
				return Err(ConfigError::validation_error(
					"block_stuck_after_secs must be greater than 0",
					None,
					None,
				));
			}
			if liveness.pending_stuck_after_secs == Some(0) {
				return Err(ConfigError::validation_error(
					"pending_stuck_after_secs must be greater than 0",
					None,
					None,
				));
			}
		}

		let mut seen = HashSet::new();
		for address in &self.gateway_addresses {
			if address.trim().is_empty() {
				return Err(ConfigError::validation_error(
					"Gateway addresses must not be blank",
					None,
					None,
				));
			}
			if !seen.insert(self.network_type.normalize_address(address)) {
				return Err(ConfigError::validation_error(
					format!("Duplicate gateway address: {}", address),
					None,
					None,
				));
			}
		}

		Ok(())
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		if instances
			.iter()
			.any(|existing| existing.network_type == current_instance.network_type)
		{
			return Err(ConfigError::validation_error(
				format!(
					"Duplicate network type found: {}",
					current_instance.network_type
				),
				None,
				Some(HashMap::from([
					(
						"network_type".to_string(),
						current_instance.network_type.to_string(),
					),
					("path".to_string(), file_path.to_string()),
				])),
			));
		}

		Ok(())
	}
}
