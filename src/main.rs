//! Event scanning configuration check.
//!
//! The monitor core is embedded by a hosting process that owns the block
//! sources and RPC clients (see `eventscan::bootstrap`). This binary loads and
//! validates the network configuration the core would run with and reports
//! the catalog, explorers, gateway addresses, liveness thresholds and
//! consumers.
//!
//! # Flow
//! 1. Loads `.env` and applies the CLI options
//! 2. Initializes logging
//! 3. Loads every network configuration from `<config-dir>/networks`
//! 4. Resolves gateway addresses against the catalog and reports the setup

use clap::{Arg, Command};
use dotenvy::dotenv;
use eventscan::{
	bootstrap::Result,
	repositories::{NetworkCatalog, NetworkRepository, NetworkService},
	services::{
		balance::resolve_gateways, liveness::ActivityTracker, notification::WebhookConfig,
	},
	utils::{
		constants::{DEFAULT_CONFIG_DIR, DEFAULT_WATCHDOG_INTERVAL_SECS, NETWORKS_SUBDIR},
		logging::setup_logging,
	},
};
use std::{
	env::{set_var, var},
	path::PathBuf,
};
use tracing::{error, info, warn};

/// Main entry point of the configuration check.
///
/// # Errors
/// Returns an error if the network configuration cannot be loaded.
#[tokio::main]
async fn main() -> Result<()> {
	let matches = Command::new("eventscan")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Validates the network configuration of the event scanner and reports the monitor \
			 setup it would run with.",
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("config-dir")
				.long("config-dir")
				.help("Configuration directory (default: config/)")
				.value_name("PATH"),
		)
		.get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// CLI options only apply when the environment does not set them
	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("LOG_LEVEL").is_err() {
			set_var("LOG_LEVEL", level);
		}
	}

	if let Some(dir) = matches.get_one::<String>("config-dir") {
		if var("CONFIG_DIR").is_err() {
			set_var("CONFIG_DIR", dir);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	let config_dir = var("CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
	let networks_dir = PathBuf::from(&config_dir).join(NETWORKS_SUBDIR);

	let network_service =
		NetworkService::<NetworkRepository>::new(Some(networks_dir.as_path()))
			.await
			.map_err(|e| {
				anyhow::anyhow!(
					"Failed to load network configuration from {}: {}",
					networks_dir.display(),
					e
				)
			})?;

	let mut configs: Vec<_> = network_service.get_all().into_values().collect();
	configs.sort_by_key(|config| config.network_type);

	if configs.is_empty() {
		warn!(path = %networks_dir.display(), "No networks configured");
	}

	for config in &configs {
		info!(
			network = %config.network_type,
			name = %config.name,
			provider = ?config.network_type.provider(),
			currency = %config.currency(),
			explorer = config.explorer.is_some(),
			block_stuck_after_secs = config.liveness.as_ref().map(|l| l.block_stuck_after_secs),
			pending_stuck_after_secs = config
				.liveness
				.as_ref()
				.and_then(|l| l.pending_stuck_after_secs),
			"Network configured"
		);
	}

	let gateways = resolve_gateways(&configs, &network_service);
	for gateway in &gateways {
		info!(
			network = %gateway.network,
			address = %gateway.address,
			currency = %gateway.currency,
			"Gateway address monitored"
		);
	}

	match WebhookConfig::from_env() {
		Some(config) => info!(
			url = %config.url,
			signed = config.secret.is_some(),
			"Webhook consumer configured"
		),
		None => info!("No webhook consumer configured"),
	}

	let activity = ActivityTracker::new(&configs);
	info!(
		networks = network_service.available_networks().len(),
		gateways = gateways.len(),
		liveness_watched = activity.watched_networks().count(),
		watchdog_interval_secs = DEFAULT_WATCHDOG_INTERVAL_SECS,
		"Configuration is valid"
	);

	Ok(())
}
