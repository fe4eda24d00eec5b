// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health check handler.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub facebook_configured: bool,
	pub tiktok_configured: bool,
	pub smtp_enabled: bool,
	/// Result of an SMTP connectivity check; absent when SMTP is disabled.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub smtp_healthy: Option<bool>,
	pub checkout_configured: bool,
	pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// GET /health
///
/// Reports which integrations are configured; the process itself being able
/// to answer is the health signal. SMTP is the one component with a cheap
/// connectivity test, so when configured it is exercised here.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
	let smtp_healthy = match &state.smtp {
		Some(client) => Some(client.check_health().await.is_ok()),
		None => None,
	};

	Json(HealthResponse {
		status: "ok",
		facebook_configured: state.config.facebook.is_configured(),
		tiktok_configured: state.config.tiktok.is_configured(),
		smtp_enabled: state.config.smtp.is_some(),
		smtp_healthy,
		checkout_configured: state.config.checkout.secret_key.is_some(),
		timestamp: chrono::Utc::now(),
	})
}
