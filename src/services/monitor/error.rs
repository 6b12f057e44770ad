//! Monitor error types and handling.
//!
//! Errors are logged when constructed. Monitors return them from per-entity
//! helpers and drop them at the loop level, so one failing entity or
//! transaction never stops its siblings.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors raised while a monitor processes a block
#[derive(ThisError, Debug)]
pub enum MonitorError {
	/// The watch registry lookup failed, the monitor skips the block
	#[error("Registry error: {0}")]
	RegistryError(ErrorContext),

	/// A receipt fetch failed, the transaction is skipped
	#[error("Fetch error: {0}")]
	FetchError(ErrorContext),

	/// The registry returned an entity the block cannot back
	#[error("Integrity error: {0}")]
	IntegrityError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl MonitorError {
	// Registry error
	pub fn registry_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RegistryError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Fetch error
	pub fn fetch_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FetchError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Integrity error
	pub fn integrity_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::IntegrityError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for MonitorError {
	fn trace_id(&self) -> String {
		match self {
			Self::RegistryError(ctx) => ctx.trace_id.clone(),
			Self::FetchError(ctx) => ctx.trace_id.clone(),
			Self::IntegrityError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
