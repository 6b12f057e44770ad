//! Block explorer links used when rendering alerts.

use std::{collections::HashMap, sync::Arc};

use crate::models::{ExplorerConfig, NetworkConfig, NetworkType};

/// Builds links to a network's block explorer.
pub trait BlockExplorer: Send + Sync {
	fn block_url(&self, number: u64) -> String;
	fn tx_url(&self, hash: &str) -> String;
	fn address_url(&self, address: &str) -> String;
}

/// Explorer backed by URL templates, `{}` is substituted.
#[derive(Debug, Clone)]
pub struct TemplateExplorer {
	config: ExplorerConfig,
}

impl TemplateExplorer {
	pub fn new(config: ExplorerConfig) -> Self {
		Self { config }
	}
}

impl BlockExplorer for TemplateExplorer {
	fn block_url(&self, number: u64) -> String {
		self.config.block_url.replace("{}", &number.to_string())
	}

	fn tx_url(&self, hash: &str) -> String {
		self.config.tx_url.replace("{}", hash)
	}

	fn address_url(&self, address: &str) -> String {
		self.config.address_url.replace("{}", address)
	}
}

/// Fallback for networks without an explorer, every link is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubExplorer;

impl BlockExplorer for StubExplorer {
	fn block_url(&self, _number: u64) -> String {
		String::new()
	}

	fn tx_url(&self, _hash: &str) -> String {
		String::new()
	}

	fn address_url(&self, _address: &str) -> String {
		String::new()
	}
}

/// Explorers per network.
#[derive(Clone, Default)]
pub struct ExplorerProvider {
	explorers: HashMap<NetworkType, Arc<dyn BlockExplorer>>,
}

impl ExplorerProvider {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds template explorers for every network that configures one.
	pub fn from_configs<'a>(configs: impl IntoIterator<Item = &'a NetworkConfig>) -> Self {
		let mut provider = Self::new();
		for config in configs {
			if let Some(explorer) = &config.explorer {
				provider.insert(
					config.network_type,
					Arc::new(TemplateExplorer::new(explorer.clone())),
				);
			}
		}
		provider
	}

	pub fn insert(&mut self, network: NetworkType, explorer: Arc<dyn BlockExplorer>) {
		self.explorers.insert(network, explorer);
	}

	/// Explorer of `network`, or a [`StubExplorer`] when none is configured.
	pub fn get_or_stub(&self, network: NetworkType) -> Arc<dyn BlockExplorer> {
		self.explorers
			.get(&network)
			.cloned()
			.unwrap_or_else(|| Arc::new(StubExplorer))
	}
}
