use std::{collections::HashMap, fs, path::Path};

use eventscan::{
	models::{ConfigError, ConfigLoader, CryptoCurrency, NetworkConfig, NetworkType},
	repositories::{NetworkCatalog, NetworkRepository, NetworkService, RepositoryError},
	services::{
		balance::resolve_gateways,
		blockchain::{BlockExplorer, ExplorerProvider},
	},
};
use tempfile::TempDir;

fn write_config(dir: &Path, file: &str, content: &str) {
	fs::write(dir.join(file), content).unwrap();
}

fn create_config_dir() -> TempDir {
	let temp_dir = TempDir::new().unwrap();
	write_config(
		temp_dir.path(),
		"rsk_mainnet.json",
		r#"{
			"network_type": "RSK_MAINNET",
			"name": "RSK mainnet",
			"explorer": {
				"block_url": "https://explorer.rsk.co/block/{}",
				"tx_url": "https://explorer.rsk.co/tx/{}",
				"address_url": "https://explorer.rsk.co/address/{}"
			},
			"gateway_addresses": ["0xAbCdEf"],
			"liveness": { "block_stuck_after_secs": 600 }
		}"#,
	);
	write_config(
		temp_dir.path(),
		"eos_mainnet.json",
		r#"{
			"network_type": "EOS_MAINNET",
			"name": "EOS mainnet",
			"liveness": { "block_stuck_after_secs": 60, "pending_stuck_after_secs": 120 }
		}"#,
	);
	temp_dir
}

#[tokio::test]
async fn test_network_service_loads_directory() {
	let temp_dir = create_config_dir();
	let service = NetworkService::<NetworkRepository>::new(Some(temp_dir.path()))
		.await
		.unwrap();

	assert_eq!(service.get_all().len(), 2);
	assert!(service.is_available(NetworkType::RskMainnet));
	assert!(service.is_available(NetworkType::EosMainnet));
	assert!(!service.is_available(NetworkType::EthereumMainnet));

	let eos = service.get("eos_mainnet").unwrap();
	let liveness = eos.liveness.unwrap();
	assert_eq!(liveness.block_stuck_after_secs, 60);
	assert_eq!(liveness.pending_stuck_after_secs, Some(120));
}

#[tokio::test]
async fn test_loaded_configs_drive_gateways_and_explorers() {
	let temp_dir = create_config_dir();
	let service = NetworkService::<NetworkRepository>::new(Some(temp_dir.path()))
		.await
		.unwrap();
	let configs: Vec<NetworkConfig> = service.get_all().into_values().collect();

	let gateways = resolve_gateways(&configs, &service);
	assert_eq!(gateways.len(), 1);
	assert_eq!(gateways[0].network, NetworkType::RskMainnet);
	assert_eq!(gateways[0].address, "0xabcdef");
	assert_eq!(gateways[0].currency, CryptoCurrency::Rsk);

	let explorers = ExplorerProvider::from_configs(&configs);
	assert_eq!(
		explorers
			.get_or_stub(NetworkType::RskMainnet)
			.tx_url("0x01"),
		"https://explorer.rsk.co/tx/0x01"
	);
	assert_eq!(
		explorers.get_or_stub(NetworkType::EosMainnet).block_url(7),
		""
	);
}

#[tokio::test]
async fn test_invalid_file_fails_whole_load() {
	let temp_dir = create_config_dir();
	write_config(
		temp_dir.path(),
		"waves_mainnet.json",
		r#"{
			"network_type": "WAVES_MAINNET",
			"name": "Waves",
			"liveness": { "block_stuck_after_secs": 0 }
		}"#,
	);

	let result: Result<HashMap<String, NetworkConfig>, ConfigError> =
		NetworkConfig::load_all(Some(temp_dir.path())).await;
	match result {
		Err(ConfigError::ValidationError(ctx)) => {
			assert!(ctx.message.contains("block_stuck_after_secs"));
		}
		other => panic!("Expected validation error, got {:?}", other.map(|m| m.len())),
	}

	let service = NetworkService::<NetworkRepository>::new(Some(temp_dir.path())).await;
	assert!(matches!(service, Err(RepositoryError::LoadError(_))));
}

#[tokio::test]
async fn test_duplicate_network_type_across_files() {
	let temp_dir = create_config_dir();
	write_config(
		temp_dir.path(),
		"rsk_copy.json",
		r#"{ "network_type": "RSK_MAINNET", "name": "RSK again" }"#,
	);

	let result: Result<HashMap<String, NetworkConfig>, ConfigError> =
		NetworkConfig::load_all(Some(temp_dir.path())).await;
	let err = result.unwrap_err();
	assert!(err.to_string().contains("Duplicate network type found"));
}

#[tokio::test]
async fn test_empty_directory_loads_no_networks() {
	let temp_dir = TempDir::new().unwrap();
	let service = NetworkService::<NetworkRepository>::new(Some(temp_dir.path()))
		.await
		.unwrap();

	assert!(service.get_all().is_empty());
	assert!(service.available_networks().is_empty());
}
