//! Transaction data structures.

use serde::{Deserialize, Serialize};

/// A transaction as delivered by a block source.
///
/// `inputs` is ordered; its first element is treated as the sender. UTXO
/// transactions may carry several inputs, account-model ones exactly one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transaction {
	pub hash: String,
	#[serde(default)]
	pub inputs: Vec<String>,
	#[serde(default)]
	pub outputs: Vec<String>,
	/// Chain specific payload, passed through untouched
	#[serde(default)]
	pub raw: serde_json::Value,
}

impl Transaction {
	/// Returns the sender of the transaction, `None` for input-less
	/// transactions such as coinbase ones.
	pub fn first_input(&self) -> Option<&str> {
		self.inputs.first().map(String::as_str)
	}

	/// Whether `address` is the first input of this transaction, compared
	/// case-insensitively.
	pub fn is_sent_by(&self, address: &str) -> bool {
		self.first_input()
			.map(|sender| sender.eq_ignore_ascii_case(address))
			.unwrap_or(false)
	}

	/// Every input and output address, without duplicates, in first-seen order.
	pub fn addresses(&self) -> Vec<&str> {
		let mut seen: Vec<&str> = Vec::with_capacity(self.inputs.len() + self.outputs.len());
		for address in self.inputs.iter().chain(self.outputs.iter()) {
			if !seen.contains(&address.as_str()) {
				seen.push(address.as_str());
			}
		}
		seen
	}
}
