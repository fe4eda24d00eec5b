// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed Conversions API payloads.
//!
//! Field inclusion rules are enforced by the types: absent identity fields
//! are omitted from the serialized `user_data` entirely, and monetary fields
//! only reach `custom_data` when the normalized event carries them.

use serde::Serialize;

use funnel_core::{hash_pii, normalize_phone, MarketingEvent};

/// Hashed customer identifiers plus the two fields Facebook expects in the
/// clear (`client_user_agent`, `client_ip_address`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct FacebookUserData {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub em: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ph: Option<Vec<String>>,
	#[serde(rename = "fn", skip_serializing_if = "Option::is_none")]
	pub first_name: Option<Vec<String>>,
	#[serde(rename = "ln", skip_serializing_if = "Option::is_none")]
	pub last_name: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub country: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ct: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub st: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub zp: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_user_agent: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_ip_address: Option<String>,
}

/// Contextual and monetary event data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FacebookCustomData {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_category: Option<String>,
}

/// One Conversions API event.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookEvent {
	pub event_name: String,
	/// Unix seconds, captured at send time.
	pub event_time: i64,
	pub event_id: String,
	pub action_source: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub event_source_url: Option<String>,
	pub user_data: FacebookUserData,
	pub custom_data: FacebookCustomData,
}

impl FacebookEvent {
	/// Build the wire event from a normalized marketing event.
	///
	/// All identity fields are hashed here; the phone number is reduced to
	/// digits first. `event_time` is captured now, not at the original user
	/// action time, so callers must invoke the adapter promptly.
	pub fn from_marketing(event: &MarketingEvent) -> Self {
		let identity = &event.identity;
		let hash_field = |value: &Option<String>| {
			value
				.as_deref()
				.filter(|v| !v.trim().is_empty())
				.map(|v| vec![hash_pii(v)])
		};

		let user_data = FacebookUserData {
			em: hash_field(&identity.email),
			ph: identity
				.phone
				.as_deref()
				.map(normalize_phone)
				.filter(|digits| !digits.is_empty())
				.map(|digits| vec![hash_pii(&digits)]),
			first_name: hash_field(&identity.first_name),
			last_name: hash_field(&identity.last_name),
			country: hash_field(&identity.country),
			ct: hash_field(&identity.city),
			st: hash_field(&identity.state),
			zp: hash_field(&identity.postal_code),
			client_user_agent: event.context.user_agent.clone(),
			client_ip_address: event.context.client_ip.clone(),
		};

		let custom_data = FacebookCustomData {
			currency: event.currency.clone(),
			value: event.value,
			order_id: event.order_id.clone(),
			content_name: event.content_name.clone(),
			content_category: event.content_type.clone(),
		};

		Self {
			event_name: event.name.as_str().to_string(),
			event_time: chrono::Utc::now().timestamp(),
			event_id: event.event_id.clone(),
			action_source: "website",
			event_source_url: event.context.source_url.clone(),
			user_data,
			custom_data,
		}
	}
}

/// Request body for the events endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookPayload {
	pub data: Vec<FacebookEvent>,
	/// Passthrough for non-production event verification.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub test_event_code: Option<String>,
}
