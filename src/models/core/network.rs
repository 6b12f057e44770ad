use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::CryptoCurrency;

/// Provider family a network is served by.
///
/// Monitors use the family to decide whether a network's blocks are relevant to
/// them before doing any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkProviderType {
	/// Account-model EVM-like chains (Ethereum, RSK)
	Web3,
	/// UTXO chains
	Btc,
	Neo,
	Eos,
	Tron,
	Waves,
}

/// A specific blockchain plus environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkType {
	EthereumMainnet,
	EthereumRopsten,
	RskMainnet,
	RskTestnet,
	BtcMainnet,
	#[serde(rename = "BTC_TESTNET_3")]
	BtcTestnet3,
	NeoMainnet,
	NeoTestnet,
	EosMainnet,
	EosTestnet,
	TronMainnet,
	TronTestnet,
	WavesMainnet,
	WavesTestnet,
}

impl NetworkType {
	/// Every known network type.
	pub const ALL: [NetworkType; 14] = [
		NetworkType::EthereumMainnet,
		NetworkType::EthereumRopsten,
		NetworkType::RskMainnet,
		NetworkType::RskTestnet,
		NetworkType::BtcMainnet,
		NetworkType::BtcTestnet3,
		NetworkType::NeoMainnet,
		NetworkType::NeoTestnet,
		NetworkType::EosMainnet,
		NetworkType::EosTestnet,
		NetworkType::TronMainnet,
		NetworkType::TronTestnet,
		NetworkType::WavesMainnet,
		NetworkType::WavesTestnet,
	];

	pub fn provider(&self) -> NetworkProviderType {
		match self {
			Self::EthereumMainnet | Self::EthereumRopsten | Self::RskMainnet | Self::RskTestnet => {
				NetworkProviderType::Web3
			}
			Self::BtcMainnet | Self::BtcTestnet3 => NetworkProviderType::Btc,
			Self::NeoMainnet | Self::NeoTestnet => NetworkProviderType::Neo,
			Self::EosMainnet | Self::EosTestnet => NetworkProviderType::Eos,
			Self::TronMainnet | Self::TronTestnet => NetworkProviderType::Tron,
			Self::WavesMainnet | Self::WavesTestnet => NetworkProviderType::Waves,
		}
	}

	pub fn is_testnet(&self) -> bool {
		matches!(
			self,
			Self::EthereumRopsten
				| Self::RskTestnet
				| Self::BtcTestnet3
				| Self::NeoTestnet
				| Self::EosTestnet
				| Self::TronTestnet
				| Self::WavesTestnet
		)
	}

	/// Short label used in alerts, testnets are prefixed with `t`.
	pub fn label(&self) -> String {
		let base = match self.provider() {
			NetworkProviderType::Web3 => match self {
				Self::RskMainnet | Self::RskTestnet => "RSK",
				_ => "ETH",
			},
			NetworkProviderType::Btc => "BTC",
			NetworkProviderType::Neo => "NEO",
			NetworkProviderType::Eos => "EOS",
			NetworkProviderType::Tron => "TRON",
			NetworkProviderType::Waves => "WAVES",
		};
		if self.is_testnet() {
			format!("t{}", base)
		} else {
			base.to_string()
		}
	}

	/// Lowercase identifier used for configuration keys and metric labels.
	pub fn slug(&self) -> &'static str {
		match self {
			Self::EthereumMainnet => "ethereum_mainnet",
			Self::EthereumRopsten => "ethereum_ropsten",
			Self::RskMainnet => "rsk_mainnet",
			Self::RskTestnet => "rsk_testnet",
			Self::BtcMainnet => "btc_mainnet",
			Self::BtcTestnet3 => "btc_testnet_3",
			Self::NeoMainnet => "neo_mainnet",
			Self::NeoTestnet => "neo_testnet",
			Self::EosMainnet => "eos_mainnet",
			Self::EosTestnet => "eos_testnet",
			Self::TronMainnet => "tron_mainnet",
			Self::TronTestnet => "tron_testnet",
			Self::WavesMainnet => "waves_mainnet",
			Self::WavesTestnet => "waves_testnet",
		}
	}

	/// Hex addresses of EVM-like chains compare case-insensitively, every other
	/// family uses case-sensitive encodings.
	pub fn has_case_insensitive_addresses(&self) -> bool {
		self.provider() == NetworkProviderType::Web3
	}

	/// Normalizes an address into the form used as `transactions_by_address` key.
	pub fn normalize_address(&self, address: &str) -> String {
		if self.has_case_insensitive_addresses() {
			address.to_lowercase()
		} else {
			address.to_string()
		}
	}

	/// Currency balances of this network are denominated in.
	pub fn native_currency(&self) -> CryptoCurrency {
		match self {
			Self::EthereumMainnet | Self::EthereumRopsten => CryptoCurrency::Eth,
			Self::RskMainnet | Self::RskTestnet => CryptoCurrency::Rsk,
			Self::BtcMainnet | Self::BtcTestnet3 => CryptoCurrency::Btc,
			Self::NeoMainnet | Self::NeoTestnet => CryptoCurrency::Neo,
			Self::EosMainnet | Self::EosTestnet => CryptoCurrency::Eos,
			Self::TronMainnet | Self::TronTestnet => CryptoCurrency::Trx,
			Self::WavesMainnet | Self::WavesTestnet => CryptoCurrency::Waves,
		}
	}
}

impl fmt::Display for NetworkType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.slug())
	}
}

/// URL templates of a block explorer, `{}` is replaced by the block number,
/// transaction hash or address.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExplorerConfig {
	pub block_url: String,
	pub tx_url: String,
	pub address_url: String,
}

/// Thresholds after which the liveness watchdog considers a network stuck.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LivenessConfig {
	pub block_stuck_after_secs: u64,
	#[serde(default)]
	pub pending_stuck_after_secs: Option<u64>,
}

/// Configuration of one network, loaded from `config/networks/*.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NetworkConfig {
	pub network_type: NetworkType,
	pub name: String,
	#[serde(default)]
	pub explorer: Option<ExplorerConfig>,
	/// Gateway addresses whose balance movements are reported
	#[serde(default)]
	pub gateway_addresses: Vec<String>,
	/// Overrides the network's native currency for gateway balance reports
	#[serde(default)]
	pub currency: Option<CryptoCurrency>,
	#[serde(default)]
	pub liveness: Option<LivenessConfig>,
}

impl NetworkConfig {
	pub fn currency(&self) -> CryptoCurrency {
		self.currency
			.unwrap_or_else(|| self.network_type.native_currency())
	}
}
