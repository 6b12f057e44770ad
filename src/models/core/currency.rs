//! Currencies and the raw-amount rendering contract.
//!
//! Amounts travel through the pipeline as raw integers in the currency's
//! smallest unit. Rendering divides by `10^decimals` and drops trailing zero
//! fractional digits, so `12345678` with 6 decimals renders as `12.345678` and
//! `5000000` as `5`.

use alloy::primitives::{I256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies balances and deltas are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CryptoCurrency {
	Eth,
	Rsk,
	Btc,
	Neo,
	Gas,
	Eos,
	Trx,
	Waves,
}

impl CryptoCurrency {
	pub fn decimals(&self) -> u8 {
		match self {
			Self::Eth | Self::Rsk => 18,
			Self::Btc | Self::Gas | Self::Waves => 8,
			Self::Neo => 0,
			Self::Eos => 4,
			Self::Trx => 6,
		}
	}

	pub fn ticker(&self) -> &'static str {
		match self {
			Self::Eth => "ETH",
			Self::Rsk => "RSK",
			Self::Btc => "BTC",
			Self::Neo => "NEO",
			Self::Gas => "GAS",
			Self::Eos => "EOS",
			Self::Trx => "TRX",
			Self::Waves => "WAVES",
		}
	}

	/// Renders a raw amount followed by the ticker, e.g. `12.5 ETH`.
	pub fn format(&self, raw: U256) -> String {
		format!("{} {}", format_amount(raw, self.decimals()), self.ticker())
	}

	/// Renders a signed raw amount followed by the ticker, e.g. `-0.25 BTC`.
	pub fn format_signed(&self, raw: I256) -> String {
		format!(
			"{} {}",
			format_signed_amount(raw, self.decimals()),
			self.ticker()
		)
	}
}

impl fmt::Display for CryptoCurrency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.ticker())
	}
}

/// Formats a raw amount with `decimals` digits of precision.
pub fn format_amount(raw: U256, decimals: u8) -> String {
	shift_decimal_point(&raw.to_string(), decimals as usize)
}

/// Formats a signed raw amount, negative values are prefixed with `-`.
pub fn format_signed_amount(raw: I256, decimals: u8) -> String {
	let magnitude = format_amount(raw.unsigned_abs(), decimals);
	if raw.is_negative() {
		format!("-{}", magnitude)
	} else {
		magnitude
	}
}

fn shift_decimal_point(digits: &str, decimals: usize) -> String {
	if decimals == 0 {
		return digits.to_string();
	}

	let padded = format!("{:0>width$}", digits, width = decimals + 1);
	let (integer, fraction) = padded.split_at(padded.len() - decimals);
	let fraction = fraction.trim_end_matches('0');

	if fraction.is_empty() {
		integer.to_string()
	} else {
		format!("{}.{}", integer, fraction)
	}
}
