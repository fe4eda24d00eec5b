// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed Events API v1.3 payloads.

use serde::Serialize;

use funnel_core::{hash_pii, EventName, MarketingEvent};

/// The platform spelling for a normalized event name.
///
/// TikTok has no `Purchase` event; confirmed purchases must be reported as
/// `CompletePayment`.
pub fn wire_event_name(name: EventName) -> &'static str {
	match name {
		EventName::Purchase => "CompletePayment",
		other => other.as_str(),
	}
}

/// User match data: IP and user agent in the clear, contact fields hashed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TiktokUser {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ip: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_agent: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
}

/// Event properties (monetary and content context).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TiktokProperties {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub search_string: Option<String>,
}

/// Page context for the event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TiktokPage {
	pub url: String,
	pub referrer: String,
}

/// One Events API event.
#[derive(Debug, Clone, Serialize)]
pub struct TiktokEvent {
	pub event: String,
	/// Unix seconds, captured at send time.
	pub event_time: i64,
	pub event_id: String,
	pub user: TiktokUser,
	pub properties: TiktokProperties,
	pub page: TiktokPage,
}

impl TiktokEvent {
	/// Build the wire event from a normalized marketing event, applying the
	/// platform rename and hashing contact fields.
	pub fn from_marketing(event: &MarketingEvent) -> Self {
		let user = TiktokUser {
			ip: event.context.client_ip.clone(),
			user_agent: event.context.user_agent.clone(),
			email: event
				.identity
				.email
				.as_deref()
				.filter(|e| !e.trim().is_empty())
				.map(hash_pii),
			phone: event
				.identity
				.phone
				.as_deref()
				.filter(|p| !p.trim().is_empty())
				.map(hash_pii),
		};

		let properties = TiktokProperties {
			value: event.value,
			currency: event.currency.clone(),
			content_id: event.content_id.clone().or_else(|| event.order_id.clone()),
			content_type: event.content_type.clone(),
			content_name: event.content_name.clone(),
			search_string: None,
		};

		Self {
			event: wire_event_name(event.name).to_string(),
			event_time: chrono::Utc::now().timestamp(),
			event_id: event.event_id.clone(),
			user,
			properties,
			page: TiktokPage {
				url: event.context.source_url.clone().unwrap_or_default(),
				referrer: event.context.referrer.clone().unwrap_or_default(),
			},
		}
	}
}

/// Request body for the track endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TiktokPayload {
	pub event_source: &'static str,
	pub event_source_id: String,
	pub data: Vec<TiktokEvent>,
}

impl TiktokPayload {
	pub fn single(pixel_id: impl Into<String>, event: TiktokEvent) -> Self {
		Self {
			event_source: "web",
			event_source_id: pixel_id.into(),
			data: vec![event],
		}
	}
}
