//! Constants shared across the application.

/// Default directory holding the network configuration files.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Subdirectory of the configuration directory holding one JSON file per network.
pub const NETWORKS_SUBDIR: &str = "networks";

/// How often the liveness watchdog checks for stuck networks.
pub const DEFAULT_WATCHDOG_INTERVAL_SECS: u64 = 30;

/// Time format used in broadcast alerts.
pub const ALERT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
