//! Test helper utilities for transaction receipts
//!
//! - `ReceiptBuilder`: Builder for creating test TransactionReceipt instances

use crate::models::{ContractEvent, TransactionReceipt};

/// A builder for creating test receipts with default values.
#[derive(Debug, Default)]
pub struct ReceiptBuilder {
	transaction_hash: Option<String>,
	status: Option<bool>,
	logs: Vec<ContractEvent>,
}

impl ReceiptBuilder {
	/// Creates a new ReceiptBuilder instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the transaction hash of the receipt. Default is `0xtx`.
	pub fn transaction_hash(mut self, transaction_hash: &str) -> Self {
		self.transaction_hash = Some(transaction_hash.to_string());
		self
	}

	/// Sets the status of the transaction. Default is success.
	pub fn status(mut self, status: bool) -> Self {
		self.status = Some(status);
		self
	}

	/// Appends a decoded log.
	pub fn log(mut self, log: ContractEvent) -> Self {
		self.logs.push(log);
		self
	}

	pub fn logs(mut self, logs: Vec<ContractEvent>) -> Self {
		self.logs = logs;
		self
	}

	pub fn build(self) -> TransactionReceipt {
		TransactionReceipt {
			transaction_hash: self.transaction_hash.unwrap_or_else(|| "0xtx".to_string()),
			success: self.status.unwrap_or(true),
			logs: self.logs,
		}
	}
}
