//! Turns liveness signals into broadcast alerts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
	models::{
		LivenessSignal, NetworkStuckEvent, NetworkStuckSignal, PendingStuckEvent,
		PendingStuckSignal,
	},
	services::{blockchain::ExplorerProvider, event_bus::EventBus},
	utils::constants::ALERT_TIME_FORMAT,
};

/// Publishes one broadcast event per received signal.
pub struct LivenessReactor {
	explorers: ExplorerProvider,
	bus: Arc<EventBus>,
}

impl LivenessReactor {
	pub fn new(explorers: ExplorerProvider, bus: Arc<EventBus>) -> Self {
		Self { explorers, bus }
	}

	/// Builds the alert for a network that stopped producing blocks.
	pub fn network_stuck_event(&self, signal: &NetworkStuckSignal) -> NetworkStuckEvent {
		let block_link = self
			.explorers
			.get_or_stub(signal.network)
			.block_url(signal.last_block_height);
		let message = format!(
			"Network {} *stuck!* Last block was at {} [{}]({}).",
			signal.network.label(),
			format_time(signal.last_block_time),
			signal.last_block_height,
			block_link,
		);

		NetworkStuckEvent {
			network: signal.network,
			last_seen_time: signal.last_seen_time,
			last_block_height: signal.last_block_height,
			last_block_time: signal.last_block_time,
			block_link,
			message,
		}
	}

	/// Builds the alert for a network whose pending pool went quiet.
	pub fn pending_stuck_event(&self, signal: &PendingStuckSignal) -> PendingStuckEvent {
		let message = format!(
			"*No pending transactions* for the network {}! Last pending was at {}, count: {}.",
			signal.network.label(),
			format_time(signal.last_seen_time),
			signal.pending_count,
		);

		PendingStuckEvent {
			network: signal.network,
			last_seen_time: signal.last_seen_time,
			pending_count: signal.pending_count,
			message,
		}
	}

	pub async fn on_signal(&self, signal: LivenessSignal) {
		match signal {
			LivenessSignal::NetworkStuck(signal) => self.on_network_stuck(signal).await,
			LivenessSignal::PendingStuck(signal) => self.on_pending_stuck(signal).await,
		}
	}

	pub async fn on_network_stuck(&self, signal: NetworkStuckSignal) {
		let event = self.network_stuck_event(&signal);
		info!(
			network = %signal.network,
			last_block = signal.last_block_height,
			"Network stuck"
		);
		self.bus.publish(event.into()).await;
	}

	pub async fn on_pending_stuck(&self, signal: PendingStuckSignal) {
		let event = self.pending_stuck_event(&signal);
		info!(
			network = %signal.network,
			pending_count = signal.pending_count,
			"Pending pool stuck"
		);
		self.bus.publish(event.into()).await;
	}
}

fn format_time(time: DateTime<Utc>) -> String {
	time.format(ALERT_TIME_FORMAT).to_string()
}
