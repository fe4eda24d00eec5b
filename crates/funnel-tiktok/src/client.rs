// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client for the Events API.

use std::sync::Arc;

use serde::Deserialize;

use funnel_config::TiktokConfig;
use funnel_core::{MarketingEvent, Platform};
use funnel_monitor::{EventMonitor, MonitorEntry};

use crate::payload::{wire_event_name, TiktokEvent, TiktokPayload};

const TRACK_PATH: &str = "/open_api/v1.3/event/track/";

/// Errors from an Events API send attempt.
#[derive(Debug, thiserror::Error)]
pub enum TiktokError {
	/// A required credential is not configured. Fatal for this call only;
	/// no HTTP request is attempted.
	#[error("missing TikTok credential: {0}")]
	MissingCredential(&'static str),

	/// TikTok rejected the event (non-2xx response).
	#[error("TikTok API error ({status}): {body}")]
	Upstream { status: u16, body: String },

	/// The HTTP request itself failed (network error, timeout).
	#[error("HTTP request failed: {0}")]
	Transport(#[from] reqwest::Error),
}

/// Parsed Events API acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TiktokResponse {
	#[serde(default)]
	pub code: Option<i64>,
	#[serde(default)]
	pub message: Option<String>,
}

/// Events API client.
pub struct TiktokClient {
	config: TiktokConfig,
	monitor: Arc<EventMonitor>,
	http: reqwest::Client,
}

impl TiktokClient {
	pub fn new(config: TiktokConfig, monitor: Arc<EventMonitor>) -> Self {
		Self {
			config,
			monitor,
			http: funnel_core::http::new_client(),
		}
	}

	/// Send one conversion event.
	#[tracing::instrument(skip(self, event), fields(event_name = %event.name, event_id = %event.event_id))]
	pub async fn send(&self, event: &MarketingEvent) -> Result<TiktokResponse, TiktokError> {
		let result = self.dispatch(event).await;

		match &result {
			Ok(response) => {
				tracing::info!(code = ?response.code, "TikTok conversion event sent");
				self.record(event, true, None);
			}
			Err(error) => {
				tracing::warn!(error = %error, "TikTok conversion event failed");
				self.record(event, false, Some(error.to_string()));
			}
		}

		result
	}

	async fn dispatch(&self, event: &MarketingEvent) -> Result<TiktokResponse, TiktokError> {
		let pixel_id = self
			.config
			.pixel_id
			.as_deref()
			.ok_or(TiktokError::MissingCredential("pixel id"))?;
		let access_token = self
			.config
			.access_token
			.as_ref()
			.ok_or(TiktokError::MissingCredential("access token"))?;
		if self.config.advertiser_id.is_none() {
			return Err(TiktokError::MissingCredential("advertiser id"));
		}

		// Tokens pasted from the TikTok console are sometimes percent-encoded.
		let access_token = decode_token(access_token.expose());

		let payload = TiktokPayload::single(pixel_id, TiktokEvent::from_marketing(event));
		let url = format!("{}{}", self.config.base_url, TRACK_PATH);

		let response = self
			.http
			.post(&url)
			.header("Access-Token", access_token)
			.json(&payload)
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			return Err(TiktokError::Upstream {
				status: status.as_u16(),
				body,
			});
		}

		Ok(serde_json::from_str(&body).unwrap_or_default())
	}

	fn record(&self, event: &MarketingEvent, success: bool, error: Option<String>) {
		self.monitor.record(MonitorEntry {
			platform: Platform::TikTok,
			event_name: wire_event_name(event.name).to_string(),
			event_id: event.event_id.clone(),
			success,
			host: event.context.host.clone().unwrap_or_default(),
			user_agent: event.context.user_agent.clone().unwrap_or_default(),
			has_email: event.identity.has_email(),
			has_phone: event.identity.has_phone(),
			value: event.value.map(|v| v.to_string()),
			currency: event.currency.clone(),
			error,
		});
	}
}

/// Decode a percent-encoded access token; returns the input unchanged when it
/// contains no valid escapes.
fn decode_token(token: &str) -> String {
	if !token.contains('%') {
		return token.to_string();
	}

	// Decode over bytes; slicing the &str here could land inside a
	// multi-byte character and panic on a pasted non-ASCII token.
	let bytes = token.as_bytes();
	let mut decoded = Vec::with_capacity(bytes.len());
	let mut i = 0;
	while i < bytes.len() {
		if bytes[i] == b'%' && i + 2 < bytes.len() {
			let hi = (bytes[i + 1] as char).to_digit(16);
			let lo = (bytes[i + 2] as char).to_digit(16);
			if let (Some(hi), Some(lo)) = (hi, lo) {
				decoded.push((hi * 16 + lo) as u8);
				i += 3;
				continue;
			}
		}
		decoded.push(bytes[i]);
		i += 1;
	}

	String::from_utf8(decoded).unwrap_or_else(|_| token.to_string())
}
