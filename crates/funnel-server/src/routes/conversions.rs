// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server-side conversion endpoints.
//!
//! Each request maps to a single-platform Conversions/Events API call. The
//! browser passes the event id its pixel used so the platform's dedup window
//! collapses the pair into one counted conversion; with no id supplied a
//! fresh one is generated and returned.
//!
//! Failures resolve to a `success: false` body, never an error status:
//! tracking outcomes are for the monitor, not for interrupting the page.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use funnel_core::{generate_event_id, EventName, Identity, MarketingEvent, RequestContext};

use crate::api::AppState;

const FALLBACK_IP: &str = "127.0.0.1";

#[derive(Debug, Deserialize)]
pub struct ConversionRequest {
	pub event_name: String,
	/// Dedup id shared with the browser pixel; generated when absent.
	pub event_id: Option<String>,

	pub email: Option<String>,
	pub phone: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub country: Option<String>,
	pub city: Option<String>,
	pub state: Option<String>,
	pub postal_code: Option<String>,

	pub value: Option<f64>,
	pub currency: Option<String>,
	pub content_name: Option<String>,
	pub content_id: Option<String>,
	pub content_type: Option<String>,
	pub order_id: Option<String>,
	pub source_url: Option<String>,
	pub referrer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversionResponse {
	pub success: bool,
	pub event_id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

enum EventParseError {
	UnknownName(String),
}

fn build_event(
	request: ConversionRequest,
	headers: &HeaderMap,
) -> Result<MarketingEvent, EventParseError> {
	let name: EventName = request
		.event_name
		.parse()
		.map_err(EventParseError::UnknownName)?;

	let mut context = RequestContext::from_headers(headers, FALLBACK_IP);
	if request.source_url.is_some() {
		context.source_url = request.source_url;
	}
	if request.referrer.is_some() {
		context.referrer = request.referrer;
	}

	let identity = Identity {
		email: request.email,
		phone: request.phone,
		first_name: request.first_name,
		last_name: request.last_name,
		country: request.country,
		city: request.city,
		state: request.state,
		postal_code: request.postal_code,
	};

	let event_id = request.event_id.unwrap_or_else(generate_event_id);
	let mut event = MarketingEvent::new(name, event_id)
		.with_identity(identity)
		.with_context(context)
		.with_content(request.content_name, request.content_id, request.content_type);
	event.order_id = request.order_id;

	if let (Some(value), Some(currency)) = (request.value, request.currency) {
		event = event.with_value(value, currency);
	}

	Ok(event)
}

fn rejected(message: String) -> Json<ConversionResponse> {
	Json(ConversionResponse {
		success: false,
		event_id: String::new(),
		error: Some(message),
	})
}

/// POST /api/facebook-conversion
pub async fn facebook_conversion(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<ConversionRequest>,
) -> Json<ConversionResponse> {
	let event = match build_event(request, &headers) {
		Ok(event) => event,
		Err(EventParseError::UnknownName(message)) => return rejected(message),
	};

	let result = state.facebook.send(&event).await;
	Json(ConversionResponse {
		success: result.is_ok(),
		event_id: event.event_id,
		error: result.err().map(|e| e.to_string()),
	})
}

/// POST /api/tiktok-conversion
pub async fn tiktok_conversion(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<ConversionRequest>,
) -> Json<ConversionResponse> {
	let event = match build_event(request, &headers) {
		Ok(event) => event,
		Err(EventParseError::UnknownName(message)) => return rejected(message),
	};

	let result = state.tiktok.send(&event).await;
	Json(ConversionResponse {
		success: result.is_ok(),
		event_id: event.event_id,
		error: result.err().map(|e| e.to_string()),
	})
}
