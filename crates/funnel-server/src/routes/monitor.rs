// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operational event monitor endpoint.

use axum::{
	extract::{Query, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use serde::Deserialize;

use funnel_core::Platform;

use crate::api::AppState;

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct MonitorQuery {
	pub platform: Option<String>,
	pub limit: Option<usize>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
	headers
		.get("authorization")
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.strip_prefix("Bearer "))
}

/// GET /api/monitor-events
///
/// Bearer-gated dashboard query. This is operational visibility, not a
/// security boundary; the shared secret keeps crawlers and curious users out.
pub async fn monitor_events(
	State(state): State<AppState>,
	Query(params): Query<MonitorQuery>,
	headers: HeaderMap,
) -> Response {
	let authorized = bearer_token(&headers)
		.is_some_and(|token| token == state.config.monitor.auth_key.expose());
	if !authorized {
		return (
			StatusCode::UNAUTHORIZED,
			Json(serde_json::json!({"error": "unauthorized"})),
		)
			.into_response();
	}

	let platform = match params.platform.as_deref() {
		None | Some("") => None,
		Some(raw) => match raw.parse::<Platform>() {
			Ok(platform) => Some(platform),
			Err(message) => {
				return (
					StatusCode::BAD_REQUEST,
					Json(serde_json::json!({"error": message})),
				)
					.into_response();
			}
		},
	};

	let report = state
		.monitor
		.query(platform, params.limit.unwrap_or(DEFAULT_LIMIT));
	Json(report).into_response()
}
