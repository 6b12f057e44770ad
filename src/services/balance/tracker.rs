//! Balance delta tracking for monitored gateway addresses.
//!
//! The first block touching a gateway fetches its balance inline to seed the
//! snapshot. Later blocks spawn the fetch and let the continuation apply the
//! result with the height gate of [`SnapshotStore::apply`], so a block source
//! is never blocked by a slow balance query and out-of-order completions are
//! dropped.

use std::{
	collections::{HashMap, HashSet},
	sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
	models::{CryptoCurrency, FgwBalanceChangedEvent, NetworkConfig, NetworkType, NewBlockEvent},
	repositories::NetworkCatalog,
	services::{
		balance::snapshot::{BalanceSnapshot, BalanceUpdate, SnapshotStore},
		blockchain::BalanceFetcher,
		event_bus::EventBus,
		monitor::{BlockMonitor, MonitorError},
	},
	utils::metrics::FETCH_FAILURES,
};

/// A gateway address whose balance movements are reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GatewayAddress {
	pub network: NetworkType,
	/// Normalized with [`NetworkType::normalize_address`]
	pub address: String,
	pub currency: CryptoCurrency,
}

impl GatewayAddress {
	pub fn new(network: NetworkType, address: &str, currency: CryptoCurrency) -> Self {
		Self {
			network,
			address: network.normalize_address(address),
			currency,
		}
	}
}

/// Collects the configured gateway addresses of the networks present in
/// `catalog`. Addresses of unavailable networks are ignored with a warning.
pub fn resolve_gateways<'a>(
	configs: impl IntoIterator<Item = &'a NetworkConfig>,
	catalog: &dyn NetworkCatalog,
) -> Vec<GatewayAddress> {
	let available = catalog.available_networks();
	let mut seen = HashSet::new();
	let mut gateways = Vec::new();

	for config in configs {
		if config.gateway_addresses.is_empty() {
			continue;
		}
		if !available.contains(&config.network_type) {
			warn!(
				network = %config.network_type,
				"Gateway addresses configured, but the network is not available; ignoring them"
			);
			continue;
		}
		for address in &config.gateway_addresses {
			let gateway = GatewayAddress::new(config.network_type, address, config.currency());
			if seen.insert((gateway.network, gateway.address.clone())) {
				gateways.push(gateway);
			}
		}
	}

	gateways
}

/// Tracks gateway balances and publishes `FgwBalanceChanged` events.
pub struct BalanceDeltaTracker {
	gateways: HashMap<NetworkType, Vec<GatewayAddress>>,
	balances: Arc<dyn BalanceFetcher>,
	store: SnapshotStore,
	bus: Arc<EventBus>,
	pending: Mutex<Vec<JoinHandle<()>>>,
}

impl BalanceDeltaTracker {
	pub fn new(
		gateways: Vec<GatewayAddress>,
		balances: Arc<dyn BalanceFetcher>,
		bus: Arc<EventBus>,
	) -> Self {
		let mut by_network: HashMap<NetworkType, Vec<GatewayAddress>> = HashMap::new();
		for gateway in gateways {
			by_network.entry(gateway.network).or_default().push(gateway);
		}

		Self {
			gateways: by_network,
			balances,
			store: SnapshotStore::new(),
			bus,
			pending: Mutex::new(Vec::new()),
		}
	}

	pub fn gateways(&self) -> impl Iterator<Item = &GatewayAddress> {
		self.gateways.values().flatten()
	}

	pub fn store(&self) -> &SnapshotStore {
		&self.store
	}

	/// Waits for every spawned balance fetch to complete.
	pub async fn wait_idle(&self) {
		let handles: Vec<_> = {
			let mut pending = self
				.pending
				.lock()
				.unwrap_or_else(|poisoned| poisoned.into_inner());
			pending.drain(..).collect()
		};
		for handle in handles {
			if let Err(e) = handle.await {
				warn!(error = %e, "Balance continuation did not complete");
			}
		}
	}

	/// Handles one qualifying block for `gateway`.
	async fn track(&self, gateway: &GatewayAddress, height: u64) {
		if self
			.store
			.get(gateway.network, &gateway.address)
			.await
			.is_some()
		{
			self.spawn_continuation(gateway.clone(), height);
			return;
		}

		match self
			.balances
			.get_balance(gateway.network, &gateway.address, height)
			.await
		{
			Ok(balance) => {
				let initialized = self
					.store
					.initialize(
						gateway.network,
						&gateway.address,
						BalanceSnapshot { balance, height },
					)
					.await;
				if initialized {
					info!(
						network = %gateway.network,
						address = %gateway.address,
						height,
						balance = %gateway.currency.format(balance),
						"Initial gateway balance"
					);
				}
			}
			Err(e) => {
				FETCH_FAILURES
					.with_label_values(&[gateway.network.slug(), "balance"])
					.inc();
				warn!(
					network = %gateway.network,
					address = %gateway.address,
					height,
					error = %e,
					"Failed to get initial gateway balance, skipping block"
				);
			}
		}
	}

	fn spawn_continuation(&self, gateway: GatewayAddress, height: u64) {
		let balances = self.balances.clone();
		let store = self.store.clone();
		let bus = self.bus.clone();

		let handle = tokio::spawn(async move {
			let balance = match balances
				.get_balance(gateway.network, &gateway.address, height)
				.await
			{
				Ok(balance) => balance,
				Err(e) => {
					FETCH_FAILURES
						.with_label_values(&[gateway.network.slug(), "balance"])
						.inc();
					warn!(
						network = %gateway.network,
						address = %gateway.address,
						height,
						error = %e,
						"Failed to get gateway balance"
					);
					return;
				}
			};

			match store
				.apply(gateway.network, &gateway.address, balance, height)
				.await
			{
				BalanceUpdate::Changed { delta, .. } => {
					bus.publish(
						FgwBalanceChangedEvent {
							network: gateway.network,
							address: gateway.address.clone(),
							actual_balance: balance,
							delta,
							currency: gateway.currency,
							block_number: height,
						}
						.into(),
					)
					.await;
				}
				BalanceUpdate::Discarded { stored_height } => {
					debug!(
						network = %gateway.network,
						address = %gateway.address,
						height,
						stored_height,
						"Discarding out-of-order balance"
					);
				}
				BalanceUpdate::Unchanged | BalanceUpdate::Initialized => {}
			}
		});

		let mut pending = self
			.pending
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner());
		pending.retain(|handle| !handle.is_finished());
		pending.push(handle);
	}
}

#[async_trait]
impl BlockMonitor for BalanceDeltaTracker {
	fn name(&self) -> &'static str {
		"balance_delta"
	}

	fn accepts(&self, network: NetworkType) -> bool {
		self.gateways.contains_key(&network)
	}

	/// Balance events are published by spawned continuations, so the returned
	/// count is always zero.
	async fn on_new_block(&self, event: &NewBlockEvent) -> Result<usize, MonitorError> {
		let Some(gateways) = self.gateways.get(&event.network_type) else {
			return Ok(0);
		};

		for gateway in gateways {
			if event.block.transactions_for(&gateway.address).is_empty() {
				continue;
			}
			self.track(gateway, event.block.number).await;
		}

		Ok(0)
	}
}
