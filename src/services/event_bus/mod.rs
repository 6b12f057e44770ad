//! Typed fan-out of derived events to registered listeners.
//!
//! Listeners subscribe to an exact [`EventKind`], to an [`EventCategory`], or to
//! every event. `publish` runs the matching listeners one after another in
//! registration order, on the caller's task. A listener that fails or panics is
//! logged and counted; the remaining listeners still run and the publisher
//! never sees the failure. Events nobody listens to are dropped.

use std::{
	panic::AssertUnwindSafe,
	sync::{Arc, RwLock},
};

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error};

use crate::{
	models::{DerivedEvent, EventCategory, EventKind},
	utils::metrics::{EVENTS_PUBLISHED, LISTENER_FAILURES},
};

/// Consumer of derived events.
#[async_trait]
pub trait EventListener: Send + Sync {
	/// Name used in failure logs.
	fn name(&self) -> &str;

	async fn on_event(&self, event: &DerivedEvent) -> anyhow::Result<()>;
}

/// Which events a registration receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
	Kind(EventKind),
	Category(EventCategory),
	All,
}

impl Subscription {
	pub fn matches(&self, event: &DerivedEvent) -> bool {
		match self {
			Self::Kind(kind) => event.kind() == *kind,
			Self::Category(category) => event.category() == *category,
			Self::All => true,
		}
	}
}

impl From<EventKind> for Subscription {
	fn from(kind: EventKind) -> Self {
		Self::Kind(kind)
	}
}

impl From<EventCategory> for Subscription {
	fn from(category: EventCategory) -> Self {
		Self::Category(category)
	}
}

struct Registration {
	subscription: Subscription,
	listener: Arc<dyn EventListener>,
}

/// Event bus shared by the monitors, the balance tracker and the liveness reactor.
#[derive(Default)]
pub struct EventBus {
	registrations: RwLock<Vec<Registration>>,
}

impl EventBus {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `listener` for the events selected by `subscription`.
	///
	/// Registering the same listener twice delivers matching events twice.
	pub fn subscribe(&self, subscription: impl Into<Subscription>, listener: Arc<dyn EventListener>) {
		let registration = Registration {
			subscription: subscription.into(),
			listener,
		};
		self.registrations
			.write()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.push(registration);
	}

	pub fn listener_count(&self) -> usize {
		self.registrations
			.read()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.len()
	}

	/// Delivers `event` to every matching listener.
	pub async fn publish(&self, event: DerivedEvent) {
		let kind = event.kind();
		EVENTS_PUBLISHED.with_label_values(&[kind.as_str()]).inc();

		// Snapshot so listeners may subscribe while the event is delivered.
		let listeners: Vec<Arc<dyn EventListener>> = self
			.registrations
			.read()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.iter()
			.filter(|registration| registration.subscription.matches(&event))
			.map(|registration| registration.listener.clone())
			.collect();

		if listeners.is_empty() {
			debug!(kind = %kind, network = %event.network(), "No listener for event, dropped");
			return;
		}

		for listener in listeners {
			match AssertUnwindSafe(listener.on_event(&event))
				.catch_unwind()
				.await
			{
				Ok(Ok(())) => {}
				Ok(Err(e)) => {
					LISTENER_FAILURES.with_label_values(&[kind.as_str()]).inc();
					error!(
						listener = listener.name(),
						kind = %kind,
						network = %event.network(),
						error = %format!("{:#}", e),
						"Event listener failed"
					);
				}
				Err(panic) => {
					LISTENER_FAILURES.with_label_values(&[kind.as_str()]).inc();
					error!(
						listener = listener.name(),
						kind = %kind,
						network = %event.network(),
						panic = %panic_message(panic.as_ref()),
						"Event listener panicked"
					);
				}
			}
		}
	}
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
	if let Some(message) = panic.downcast_ref::<&str>() {
		message.to_string()
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic".to_string()
	}
}
