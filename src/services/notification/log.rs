//! Alert log consumer.
//!
//! Renders broadcast alerts, gateway balance changes and decoded contract
//! events as markdown lines with explorer links and writes them to the log.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
	models::{ContractEvent, ContractEventsEvent, DerivedEvent, FgwBalanceChangedEvent},
	services::{blockchain::ExplorerProvider, event_bus::EventListener},
};

pub struct AlertLogNotifier {
	explorers: ExplorerProvider,
}

impl AlertLogNotifier {
	pub fn new(explorers: ExplorerProvider) -> Self {
		Self { explorers }
	}

	/// Renders `event` as alert lines. Events without a textual alert render
	/// to nothing.
	pub fn render(&self, event: &DerivedEvent) -> Vec<String> {
		match event {
			DerivedEvent::NetworkStuck(stuck) => vec![stuck.message.clone()],
			DerivedEvent::PendingStuck(stuck) => vec![stuck.message.clone()],
			DerivedEvent::FgwBalanceChanged(changed) => vec![self.render_balance(changed)],
			DerivedEvent::ContractEvents(events) => self.render_contract_events(events),
			DerivedEvent::TransactionUnlocked(_)
			| DerivedEvent::AccountCreatedNotify(_)
			| DerivedEvent::TokenCreatedNotify(_) => Vec::new(),
		}
	}

	fn render_balance(&self, event: &FgwBalanceChangedEvent) -> String {
		let explorer = self.explorers.get_or_stub(event.network);
		format!(
			"{}: gateway [{}]({}) balance changed by {}, actual balance {} at block [{}]({}).",
			event.network.label(),
			event.address,
			explorer.address_url(&event.address),
			event.currency.format_signed(event.delta),
			event.currency.format(event.actual_balance),
			event.block_number,
			explorer.block_url(event.block_number),
		)
	}

	fn render_contract_events(&self, event: &ContractEventsEvent) -> Vec<String> {
		let explorer = self.explorers.get_or_stub(event.network);
		let label = event.network.label();

		event
			.events
			.iter()
			.filter_map(|log| match log {
				ContractEvent::AccountCreated { created, .. } => Some(format!(
					"{}: account [{}]({}) created.",
					label,
					created,
					explorer.address_url(created),
				)),
				ContractEvent::TokenCreated {
					address,
					issuer,
					symbol,
				} => Some(format!(
					"{}: token [{}]({}) created by [{}]({}).",
					label,
					symbol,
					explorer.address_url(address),
					issuer,
					explorer.address_url(issuer),
				)),
				ContractEvent::ContractKilled { address, .. } => Some(format!(
					"{}: contract [{}]({}) killed in [{}]({}).",
					label,
					address,
					explorer.address_url(address),
					event.transaction.hash,
					explorer.tx_url(&event.transaction.hash),
				)),
				ContractEvent::Transfer { .. } => None,
			})
			.collect()
	}
}

#[async_trait]
impl EventListener for AlertLogNotifier {
	fn name(&self) -> &str {
		"alert_log"
	}

	async fn on_event(&self, event: &DerivedEvent) -> anyhow::Result<()> {
		let broadcast = matches!(
			event,
			DerivedEvent::NetworkStuck(_) | DerivedEvent::PendingStuck(_)
		);
		for line in self.render(event) {
			if broadcast {
				warn!(network = %event.network(), kind = %event.kind(), "{}", line);
			} else {
				info!(network = %event.network(), kind = %event.kind(), "{}", line);
			}
		}
		Ok(())
	}
}
