//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines the counters updated by the monitor pipeline, the balance tracker
//!   and the event bus.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
	// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	// Blocks handed to the monitor pipeline, per network.
	pub static ref BLOCKS_PROCESSED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("blocks_processed_total", "Blocks processed by the monitor pipeline"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Derived events published on the event bus, per event kind.
	pub static ref EVENTS_PUBLISHED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("derived_events_published_total", "Derived events published on the event bus"),
			&["kind"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Listener failures caught at the event bus boundary, per event kind.
	pub static ref LISTENER_FAILURES: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("event_listener_failures_total", "Listener failures caught by the event bus"),
			&["kind"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Receipt and balance fetch failures, per network and fetch kind.
	pub static ref FETCH_FAILURES: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("fetch_failures_total", "Receipt and balance fetch failures"),
			&["network", "fetch"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};
}

/// Gather all metrics and encode them in the Prometheus text format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}
