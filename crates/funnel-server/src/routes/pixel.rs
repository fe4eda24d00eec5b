// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-only pixel descriptor handlers.
//!
//! These endpoints fire no platform API call; they hand the browser a
//! descriptor (event name, dedup id, content fields) for its pixel to send,
//! plus an attribution verdict gating whether the Facebook pixel should fire
//! at all.

use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};

use funnel_track::{facebook_attribution, pixel, PixelEvent};

#[derive(Debug, Deserialize)]
pub struct ViewContentRequest {
	pub content_name: Option<String>,
	pub content_id: Option<String>,
	/// The page's query string, for UTM/fbclid attribution.
	#[serde(default)]
	pub query: Option<String>,
	/// `document.referrer`; the Referer header is the fallback.
	#[serde(default)]
	pub referrer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ButtonClickRequest {
	pub location: String,
	pub text: String,
	#[serde(default)]
	pub query: Option<String>,
	#[serde(default)]
	pub referrer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PixelResponse {
	#[serde(flatten)]
	pub event: PixelEvent,
	/// Whether the visit looks attributable to a Facebook ad; the browser
	/// fires the Facebook pixel only when true.
	pub facebook_attributed: bool,
}

fn attributed(headers: &HeaderMap, query: Option<&str>, referrer: Option<&str>) -> bool {
	let header_str = |name: header::HeaderName| {
		headers
			.get(name)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default()
			.to_string()
	};
	let host = header_str(header::HOST);
	let referrer = match referrer {
		Some(referrer) => referrer.to_string(),
		None => header_str(header::REFERER),
	};

	facebook_attribution(query.unwrap_or_default(), &referrer, &host)
}

/// POST /api/track/view-content
pub async fn track_view_content(
	headers: HeaderMap,
	Json(request): Json<ViewContentRequest>,
) -> Json<PixelResponse> {
	let facebook_attributed =
		attributed(&headers, request.query.as_deref(), request.referrer.as_deref());
	Json(PixelResponse {
		event: pixel::view_content(request.content_name, request.content_id),
		facebook_attributed,
	})
}

/// POST /api/track/button-click
pub async fn track_button_click(
	headers: HeaderMap,
	Json(request): Json<ButtonClickRequest>,
) -> Json<PixelResponse> {
	let facebook_attributed =
		attributed(&headers, request.query.as_deref(), request.referrer.as_deref());
	Json(PixelResponse {
		event: pixel::button_click(&request.location, &request.text),
		facebook_attributed,
	})
}
