//! Freshness watchdog.
//!
//! [`ActivityTracker`] remembers the last block and the last non-empty pending
//! pool observed per network. [`ActivityTracker::check`] compares them with
//! the thresholds of [`LivenessConfig`] and raises a signal once per stall;
//! the next observed activity re-arms the network.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use crate::{
	models::{
		LivenessConfig, LivenessSignal, NetworkConfig, NetworkStuckSignal, NetworkType,
		PendingStuckSignal,
	},
	services::liveness::LivenessReactor,
};

#[derive(Debug, Clone, Copy)]
struct BlockActivity {
	height: u64,
	block_time: DateTime<Utc>,
	seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct PendingActivity {
	count: u64,
	seen_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct NetworkActivity {
	block: Option<BlockActivity>,
	pending: Option<PendingActivity>,
	block_alerted: bool,
	pending_alerted: bool,
}

/// Per-network record of the most recent chain activity.
pub struct ActivityTracker {
	thresholds: HashMap<NetworkType, LivenessConfig>,
	activity: Mutex<HashMap<NetworkType, NetworkActivity>>,
}

impl ActivityTracker {
	/// Networks without a `liveness` section are recorded but never checked.
	pub fn new<'a>(configs: impl IntoIterator<Item = &'a NetworkConfig>) -> Self {
		let thresholds = configs
			.into_iter()
			.filter_map(|config| {
				config
					.liveness
					.clone()
					.map(|liveness| (config.network_type, liveness))
			})
			.collect();

		Self {
			thresholds,
			activity: Mutex::new(HashMap::new()),
		}
	}

	pub fn watched_networks(&self) -> impl Iterator<Item = &NetworkType> {
		self.thresholds.keys()
	}

	pub async fn record_block(&self, network: NetworkType, height: u64, block_time: DateTime<Utc>) {
		self.record_block_at(network, height, block_time, Utc::now())
			.await;
	}

	pub async fn record_block_at(
		&self,
		network: NetworkType,
		height: u64,
		block_time: DateTime<Utc>,
		seen_at: DateTime<Utc>,
	) {
		let mut activity = self.activity.lock().await;
		let entry = activity.entry(network).or_default();
		if entry.block_alerted {
			info!(network = %network, height, "Network producing blocks again");
		}
		entry.block = Some(BlockActivity {
			height,
			block_time,
			seen_at,
		});
		entry.block_alerted = false;
	}

	/// Records a pending pool observation. Empty observations are ignored so
	/// the pending threshold measures time since the pool was last non-empty.
	pub async fn record_pending(&self, network: NetworkType, count: u64) {
		self.record_pending_at(network, count, Utc::now()).await;
	}

	pub async fn record_pending_at(&self, network: NetworkType, count: u64, seen_at: DateTime<Utc>) {
		if count == 0 {
			return;
		}

		let mut activity = self.activity.lock().await;
		let entry = activity.entry(network).or_default();
		entry.pending = Some(PendingActivity { count, seen_at });
		entry.pending_alerted = false;
	}

	/// Returns the signals for every network whose threshold elapsed since its
	/// last activity and that has not been signalled for this stall yet.
	pub async fn check(&self, now: DateTime<Utc>) -> Vec<LivenessSignal> {
		let mut activity = self.activity.lock().await;
		let mut signals = Vec::new();

		let mut networks: Vec<_> = self.thresholds.iter().collect();
		networks.sort_by_key(|(network, _)| **network);

		for (network, liveness) in networks {
			let Some(entry) = activity.get_mut(network) else {
				continue;
			};

			if let Some(block) = entry.block {
				if !entry.block_alerted
					&& elapsed_secs(block.seen_at, now) >= liveness.block_stuck_after_secs
				{
					entry.block_alerted = true;
					signals.push(LivenessSignal::NetworkStuck(NetworkStuckSignal {
						network: *network,
						last_seen_time: block.seen_at,
						last_block_height: block.height,
						last_block_time: block.block_time,
					}));
				}
			}

			if let (Some(pending), Some(threshold)) = (entry.pending, liveness.pending_stuck_after_secs)
			{
				if !entry.pending_alerted && elapsed_secs(pending.seen_at, now) >= threshold {
					entry.pending_alerted = true;
					signals.push(LivenessSignal::PendingStuck(PendingStuckSignal {
						network: *network,
						last_seen_time: pending.seen_at,
						pending_count: pending.count,
					}));
				}
			}
		}

		signals
	}
}

fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
	u64::try_from((now - since).num_seconds()).unwrap_or(0)
}

/// Checks `tracker` every `period` and forwards the signals to `reactor`
/// until `shutdown` turns true or its sender is dropped.
pub async fn run_watchdog(
	tracker: Arc<ActivityTracker>,
	reactor: Arc<LivenessReactor>,
	period: Duration,
	mut shutdown: watch::Receiver<bool>,
) {
	let mut ticker = tokio::time::interval(period);
	ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

	loop {
		tokio::select! {
			_ = ticker.tick() => {
				for signal in tracker.check(Utc::now()).await {
					reactor.on_signal(signal).await;
				}
			}
			changed = shutdown.changed() => {
				if changed.is_err() || *shutdown.borrow() {
					info!("Shutting down liveness watchdog");
					break;
				}
				debug!("Ignoring shutdown channel update");
			}
		}
	}
}
