//! Blockchain collaborator interfaces.
//!
//! Provides the abstractions the monitor core uses to reach the chains:
//!
//! - Receipt and balance fetcher traits implemented by the RPC clients
//! - Block explorer links for alert rendering
//! - Error handling for blockchain operations

mod error;
mod explorer;
mod fetcher;

pub use error::BlockChainError;
pub use explorer::{BlockExplorer, ExplorerProvider, StubExplorer, TemplateExplorer};
pub use fetcher::{BalanceFetcher, ReceiptFetcher};
