//! Bootstrap module for initializing services and creating handlers.
//!
//! The hosting process owns the block sources and the RPC clients. It hands
//! the fetchers, the watch registry and the network catalog to
//! [`initialize_services`], registers the consumers with
//! [`register_consumers`] and feeds blocks to the handler returned by
//! [`create_block_handler`].
//!
//! # Services
//! - `EventBus`: Delivers derived events to the consumers
//! - `MonitorPipeline`: Dispatches new blocks to the monitors
//! - `BalanceDeltaTracker`: Reports gateway balance movements
//! - `ActivityTracker` / `LivenessReactor`: Raise stuck-network alerts
//!
//! # Handlers
//! - `create_block_handler`: Creates a block handler function that runs the pipeline for new
//!   blocks until shutdown
//! - `spawn_watchdog`: Runs the liveness watchdog until shutdown

use futures::future::BoxFuture;
use std::{error::Error, sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::info;

use crate::{
	models::{EventCategory, EventKind, NetworkConfig, NewBlockEvent},
	repositories::{NetworkCatalog, WatchRegistry},
	services::{
		balance::{resolve_gateways, BalanceDeltaTracker},
		blockchain::{BalanceFetcher, ExplorerProvider, ReceiptFetcher},
		event_bus::EventBus,
		liveness::{run_watchdog, ActivityTracker, LivenessReactor},
		monitor::{
			BlockMonitor, ContractEventsMonitor, EosActionsMonitor, LockMonitor, MonitorPipeline,
		},
		notification::{AlertLogNotifier, WebhookConfig, WebhookNotifier},
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// External collaborators supplied by the hosting process.
#[derive(Clone)]
pub struct Collaborators {
	pub registry: Arc<dyn WatchRegistry>,
	pub receipts: Arc<dyn ReceiptFetcher>,
	pub balances: Arc<dyn BalanceFetcher>,
	pub catalog: Arc<dyn NetworkCatalog>,
}

/// The wired services.
#[derive(Clone)]
pub struct Services {
	pub bus: Arc<EventBus>,
	pub explorers: ExplorerProvider,
	pub pipeline: MonitorPipeline,
	pub balance_tracker: Arc<BalanceDeltaTracker>,
	pub activity: Arc<ActivityTracker>,
	pub reactor: Arc<LivenessReactor>,
}

/// Initializes all services of the monitor core.
///
/// Gateway addresses of networks missing from the catalog are dropped with a
/// warning. The pipeline runs the lock, contract events, EOS actions and
/// balance monitors and records block activity for the watchdog.
pub fn initialize_services(configs: &[NetworkConfig], collaborators: Collaborators) -> Services {
	let bus = Arc::new(EventBus::new());
	let explorers = ExplorerProvider::from_configs(configs);

	let gateways = resolve_gateways(configs, collaborators.catalog.as_ref());
	let balance_tracker = Arc::new(BalanceDeltaTracker::new(
		gateways,
		collaborators.balances.clone(),
		bus.clone(),
	));

	let monitors: Vec<Arc<dyn BlockMonitor>> = vec![
		Arc::new(LockMonitor::new(
			collaborators.registry.clone(),
			collaborators.receipts.clone(),
			bus.clone(),
		)),
		Arc::new(ContractEventsMonitor::new(
			collaborators.registry.clone(),
			collaborators.receipts.clone(),
			bus.clone(),
		)),
		Arc::new(EosActionsMonitor::new(
			collaborators.registry.clone(),
			collaborators.receipts.clone(),
			bus.clone(),
		)),
		balance_tracker.clone(),
	];

	let activity = Arc::new(ActivityTracker::new(configs));
	let pipeline = MonitorPipeline::new(monitors).with_activity_tracker(activity.clone());
	let reactor = Arc::new(LivenessReactor::new(explorers.clone(), bus.clone()));

	info!(
		monitors = ?pipeline.monitor_names(),
		gateways = balance_tracker.gateways().count(),
		"Services initialized"
	);

	Services {
		bus,
		explorers,
		pipeline,
		balance_tracker,
		activity,
		reactor,
	}
}

/// Registers the built-in consumers on the bus.
///
/// The alert log receives broadcast alerts, balance changes and contract
/// events. The webhook, when configured, receives external notifications and
/// unlocked transactions.
pub fn register_consumers(services: &Services, webhook: Option<WebhookConfig>) -> Result<()> {
	let alert_log = Arc::new(AlertLogNotifier::new(services.explorers.clone()));
	services.bus.subscribe(EventCategory::Broadcast, alert_log.clone());
	services.bus.subscribe(EventCategory::Balance, alert_log.clone());
	services.bus.subscribe(EventKind::ContractEvents, alert_log);

	match webhook {
		Some(config) => {
			let notifier = Arc::new(WebhookNotifier::new(config, reqwest::Client::new())?);
			services
				.bus
				.subscribe(EventCategory::ExternalNotify, notifier.clone());
			services
				.bus
				.subscribe(EventKind::TransactionUnlocked, notifier);
			info!("Webhook consumer registered");
		}
		None => info!("No webhook configured, external notifications are only published"),
	}

	Ok(())
}

/// Creates a block handler function that processes new blocks from the block source.
///
/// # Arguments
/// * `shutdown_tx` - Watch channel for shutdown signals
/// * `pipeline` - Pipeline dispatching blocks to the monitors
///
/// # Returns
/// Returns a function resolving to the number of published events, zero when
/// shutdown interrupts the block
pub fn create_block_handler(
	shutdown_tx: watch::Sender<bool>,
	pipeline: MonitorPipeline,
) -> Arc<impl Fn(NewBlockEvent) -> BoxFuture<'static, usize> + Send + Sync> {
	Arc::new(
		move |event: NewBlockEvent| -> BoxFuture<'static, usize> {
			let pipeline = pipeline.clone();
			let mut shutdown_rx = shutdown_tx.subscribe();
			Box::pin(async move {
				tokio::select! {
					published = pipeline.on_new_block(&event) => published,
					_ = shutdown_rx.changed() => {
						tracing::info!("Shutting down block processing task");
						0
					}
				}
			})
		},
	)
}

/// Spawns the liveness watchdog, stopped through `shutdown_tx`.
pub fn spawn_watchdog(
	services: &Services,
	period: Duration,
	shutdown_tx: &watch::Sender<bool>,
) -> JoinHandle<()> {
	tokio::spawn(run_watchdog(
		services.activity.clone(),
		services.reactor.clone(),
		period,
		shutdown_tx.subscribe(),
	))
}
