//! Webhook notification implementation.
//!
//! Posts external notifications and unlock summaries as JSON to a single
//! endpoint. When a secret is configured every request is signed with
//! HMAC-SHA256 over the serialized payload followed by the millisecond
//! timestamp, sent in the `X-Signature` and `X-Timestamp` headers.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;
use sha2::Sha256;
use std::collections::HashMap;

use crate::{
	models::{DerivedEvent, PaymentStatus},
	services::{event_bus::EventListener, notification::NotificationError},
};

/// HMAC SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the webhook endpoint
pub const WEBHOOK_URL_ENV: &str = "WEBHOOK_URL";
/// Environment variable holding the optional signing secret
pub const WEBHOOK_SECRET_ENV: &str = "WEBHOOK_SECRET";

/// Represents a webhook configuration
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
	pub url: String,
	pub secret: Option<String>,
	pub headers: Option<HashMap<String, String>>,
}

impl WebhookConfig {
	/// Reads the configuration from `WEBHOOK_URL` and `WEBHOOK_SECRET`.
	///
	/// Returns `None` when no URL is set, a blank secret counts as no secret.
	pub fn from_env() -> Option<Self> {
		let url = std::env::var(WEBHOOK_URL_ENV)
			.ok()
			.filter(|url| !url.trim().is_empty())?;
		let secret = std::env::var(WEBHOOK_SECRET_ENV)
			.ok()
			.filter(|secret| !secret.is_empty());

		Some(Self {
			url,
			secret,
			headers: None,
		})
	}
}

/// Implementation of webhook notifications via webhooks
#[derive(Debug)]
pub struct WebhookNotifier {
	/// Webhook URL for message delivery
	pub url: String,
	/// Secret to use for the webhook request
	pub secret: Option<String>,
	/// Headers to use for the webhook request
	pub headers: Option<HashMap<String, String>>,
	client: reqwest::Client,
}

impl WebhookNotifier {
	/// Creates a new Webhook notifier instance
	///
	/// # Arguments
	/// * `config` - Webhook configuration
	/// * `client` - HTTP client used for every request
	///
	/// # Returns
	/// * `Result<Self, NotificationError>` - Notifier instance if config is valid
	pub fn new(config: WebhookConfig, client: reqwest::Client) -> Result<Self, NotificationError> {
		if let Err(e) = reqwest::Url::parse(&config.url) {
			return Err(NotificationError::config_error(
				format!("Invalid webhook url: {}", config.url),
				Some(e.into()),
				None,
			));
		}

		Ok(Self {
			url: config.url,
			secret: config.secret,
			headers: config.headers,
			client,
		})
	}

	pub fn sign_payload(
		&self,
		secret: &str,
		payload: &serde_json::Value,
	) -> Result<(String, String), NotificationError> {
		// `HmacSha256::new_from_slice` accepts empty keys
		if secret.is_empty() {
			return Err(NotificationError::notify_failed(
				"Invalid secret: cannot be empty.",
				None,
				None,
			));
		}

		let timestamp = Utc::now().timestamp_millis();

		let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
			NotificationError::config_error(format!("Invalid secret: {}", e), None, None)
		})?;

		let serialized_payload = serde_json::to_string(payload).map_err(|e| {
			NotificationError::internal_error(
				format!("Failed to serialize payload: {}", e),
				Some(e.into()),
				None,
			)
		})?;
		mac.update(format!("{}{}", serialized_payload, timestamp).as_bytes());

		let signature = hex::encode(mac.finalize().into_bytes());

		Ok((signature, timestamp.to_string()))
	}

	/// Sends a JSON payload to the webhook
	pub async fn notify_json(&self, payload: &serde_json::Value) -> Result<(), NotificationError> {
		let mut headers = HeaderMap::new();
		headers.insert(
			HeaderName::from_static("content-type"),
			HeaderValue::from_static("application/json"),
		);

		if let Some(secret) = &self.secret {
			let (signature, timestamp) = self.sign_payload(secret, payload)?;

			headers.insert(
				HeaderName::from_static("x-signature"),
				HeaderValue::from_str(&signature).map_err(|e| {
					NotificationError::notify_failed(
						"Invalid signature value",
						Some(e.into()),
						None,
					)
				})?,
			);
			headers.insert(
				HeaderName::from_static("x-timestamp"),
				HeaderValue::from_str(&timestamp).map_err(|e| {
					NotificationError::notify_failed(
						"Invalid timestamp value",
						Some(e.into()),
						None,
					)
				})?,
			);
		}

		if let Some(headers_map) = &self.headers {
			for (key, value) in headers_map {
				let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
					NotificationError::notify_failed(
						format!("Invalid header name: {}", key),
						Some(e.into()),
						None,
					)
				})?;
				let header_value = HeaderValue::from_str(value).map_err(|e| {
					NotificationError::notify_failed(
						format!("Invalid header value for {}: {}", key, value),
						Some(e.into()),
						None,
					)
				})?;
				headers.insert(header_name, header_value);
			}
		}

		let response = self
			.client
			.post(self.url.as_str())
			.headers(headers)
			.json(payload)
			.send()
			.await
			.map_err(|e| {
				NotificationError::network_error(
					format!("Failed to send webhook request: {}", e),
					Some(e.into()),
					None,
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(NotificationError::notify_failed(
				format!("Webhook request failed with status: {}", status),
				None,
				Some(HashMap::from([("url".to_string(), self.url.clone())])),
			));
		}

		Ok(())
	}
}

/// Builds the webhook payload for `event`, `None` for events the webhook
/// does not forward.
pub fn build_payload(event: &DerivedEvent) -> Option<serde_json::Value> {
	let data = match event {
		DerivedEvent::AccountCreatedNotify(notify) => serde_json::to_value(notify).ok()?,
		DerivedEvent::TokenCreatedNotify(notify) => serde_json::to_value(notify).ok()?,
		DerivedEvent::TransactionUnlocked(unlocked) => json!({
			"lock_id": unlocked.lock.id,
			"address": unlocked.lock.address,
			"tx_hash": unlocked.transaction.hash,
			"status": PaymentStatus::from_success(unlocked.receipt.success),
		}),
		_ => return None,
	};

	Some(json!({
		"event": event.kind().as_str(),
		"network": event.network(),
		"data": data,
	}))
}

#[async_trait]
impl EventListener for WebhookNotifier {
	fn name(&self) -> &str {
		"webhook"
	}

	async fn on_event(&self, event: &DerivedEvent) -> anyhow::Result<()> {
		let Some(payload) = build_payload(event) else {
			return Ok(());
		};
		self.notify_json(&payload).await?;
		Ok(())
	}
}
