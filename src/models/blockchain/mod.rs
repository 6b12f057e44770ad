//! Chain-agnostic block data.
//!
//! Every supported network is normalized by its block source into the same
//! shapes: a [`Block`] of [`Transaction`]s indexed by the addresses they touch,
//! and a [`TransactionReceipt`] whose logs are already decoded into
//! [`ContractEvent`]s.

mod block;
mod receipt;
mod transaction;

pub use block::{Block, BlockData, BlockSummary, NewBlockEvent};
pub use receipt::{ContractEvent, TransactionReceipt};
pub use transaction::Transaction;
