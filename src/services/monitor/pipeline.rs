//! Dispatch of new blocks to the monitors.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::{
	models::NewBlockEvent,
	services::{liveness::ActivityTracker, monitor::BlockMonitor},
	utils::metrics::BLOCKS_PROCESSED,
};

/// Fans each new block out to every monitor accepting its network.
///
/// Monitors run concurrently on the caller's task. A monitor that fails for
/// the whole block is logged and the others are unaffected.
#[derive(Clone, Default)]
pub struct MonitorPipeline {
	monitors: Vec<Arc<dyn BlockMonitor>>,
	activity: Option<Arc<ActivityTracker>>,
}

impl MonitorPipeline {
	pub fn new(monitors: Vec<Arc<dyn BlockMonitor>>) -> Self {
		Self {
			monitors,
			activity: None,
		}
	}

	/// Records every dispatched block in `activity` for the liveness watchdog.
	pub fn with_activity_tracker(mut self, activity: Arc<ActivityTracker>) -> Self {
		self.activity = Some(activity);
		self
	}

	pub fn monitor_names(&self) -> Vec<&'static str> {
		self.monitors.iter().map(|monitor| monitor.name()).collect()
	}

	/// Processes one block, returns how many events the monitors published.
	#[instrument(skip_all, fields(network = %event.network_type, block = event.block.number))]
	pub async fn on_new_block(&self, event: &NewBlockEvent) -> usize {
		let network = event.network_type;
		BLOCKS_PROCESSED.with_label_values(&[network.slug()]).inc();

		if let Some(activity) = &self.activity {
			activity
				.record_block(network, event.block.number, event.block.timestamp)
				.await;
		}

		let accepted: Vec<_> = self
			.monitors
			.iter()
			.filter(|monitor| monitor.accepts(network))
			.collect();

		let results = join_all(accepted.iter().map(|monitor| monitor.on_new_block(event))).await;

		let mut published = 0;
		for (monitor, result) in accepted.iter().zip(results) {
			match result {
				Ok(count) => {
					debug!(monitor = monitor.name(), events = count, "Monitor processed block");
					published += count;
				}
				Err(e) => {
					warn!(monitor = monitor.name(), error = %e, "Monitor skipped block");
				}
			}
		}

		published
	}
}
