//! Fetcher interfaces implemented by the per-chain RPC clients.
//!
//! Concrete clients live with the embedding process; the monitor core only
//! depends on these traits, passed around as `Arc<dyn ...>`.

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::{
	models::{NetworkType, Transaction, TransactionReceipt},
	services::blockchain::BlockChainError,
};

/// Resolves a transaction into its execution receipt with decoded logs.
///
/// Monitors run concurrently and fetch independently, so a transaction matched
/// by several monitors (a locked address deploying a watched contract) is
/// fetched once per monitor. Retries and caching belong to the implementation.
#[async_trait]
pub trait ReceiptFetcher: Send + Sync {
	async fn fetch(
		&self,
		network: NetworkType,
		transaction: &Transaction,
	) -> Result<TransactionReceipt, BlockChainError>;
}

/// Reads the balance of an address as of a block height.
#[async_trait]
pub trait BalanceFetcher: Send + Sync {
	async fn get_balance(
		&self,
		network: NetworkType,
		address: &str,
		height: u64,
	) -> Result<U256, BlockChainError>;
}
