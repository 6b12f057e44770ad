//! Event consumers.
//!
//! - `WebhookNotifier`: forwards external notifications and unlock
//!   summaries to an HTTP endpoint
//! - `AlertLogNotifier`: writes broadcast alerts, balance changes and
//!   contract events to the log

mod error;
mod log;
mod webhook;

pub use error::NotificationError;
pub use log::AlertLogNotifier;
pub use webhook::{
	build_payload, WebhookConfig, WebhookNotifier, WEBHOOK_SECRET_ENV, WEBHOOK_URL_ENV,
};
