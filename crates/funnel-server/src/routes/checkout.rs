// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checkout flow handlers.

use axum::{
	extract::State,
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};

use funnel_checkout::{ConfirmOutcome, EmailStatus};
use funnel_core::RequestContext;
use funnel_track::TrackSummary;

use crate::api::AppState;

const FALLBACK_IP: &str = "127.0.0.1";

#[derive(Debug, Deserialize)]
pub struct BeginRequest {
	/// Stable per-browser-session key for the once-per-visitor tracking
	/// guard. Anonymous visitors fall back to their client IP.
	pub visitor_id: Option<String>,
	pub price_id: Option<String>,
	pub quantity: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct BeginResponse {
	/// Provider-hosted payment page to redirect to.
	pub url: String,
	/// Dedup id of the InitiateCheckout pair, absent when this visitor was
	/// already tracked.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub event_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
	pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
	pub verified: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_code: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tracking: Option<TrackSummary>,
}

fn email_status_label(status: &EmailStatus) -> &'static str {
	match status {
		EmailStatus::Sent => "sent",
		EmailStatus::Failed(_) => "failed",
		EmailStatus::TimedOut => "timed_out",
		EmailStatus::Disabled => "disabled",
	}
}

fn upstream_error(error: funnel_checkout::CheckoutError) -> Response {
	tracing::error!(error = %error, "checkout provider call failed");
	(
		StatusCode::BAD_GATEWAY,
		Json(serde_json::json!({"error": error.to_string()})),
	)
		.into_response()
}

/// POST /api/checkout
///
/// Fires InitiateCheckout (once per visitor) and creates the payment
/// session. A session-creation failure is the only user-visible error.
pub async fn begin_checkout(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<BeginRequest>,
) -> Response {
	let context = RequestContext::from_headers(&headers, FALLBACK_IP);
	let visitor_key = request
		.visitor_id
		.or_else(|| context.client_ip.clone())
		.unwrap_or_else(|| FALLBACK_IP.to_string());

	let outcome = match state
		.checkout
		.begin(
			&visitor_key,
			request.price_id.as_deref(),
			request.quantity.unwrap_or(1),
			context,
		)
		.await
	{
		Ok(outcome) => outcome,
		Err(error) => return upstream_error(error),
	};

	Json(BeginResponse {
		url: outcome.url,
		event_id: outcome.tracking.map(|summary| summary.event_id),
	})
	.into_response()
}

/// POST /api/checkout/confirm
///
/// Verifies the session with the provider. A verified payment fires Purchase
/// tracking and the confirmation email; anything else reports
/// `verified: false` with no side effects.
pub async fn confirm_checkout(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<ConfirmRequest>,
) -> Response {
	let context = RequestContext::from_headers(&headers, FALLBACK_IP);

	let outcome = match state.checkout.confirm(&request.session_id, context).await {
		Ok(outcome) => outcome,
		Err(error) => return upstream_error(error),
	};

	let response = match outcome {
		ConfirmOutcome::NotVerified => ConfirmResponse {
			verified: false,
			order_code: None,
			value: None,
			currency: None,
			email: None,
			tracking: None,
		},
		ConfirmOutcome::Confirmed {
			order_code,
			value,
			currency,
			tracking,
			email,
		} => ConfirmResponse {
			verified: true,
			order_code: Some(order_code),
			value: Some(value),
			currency: Some(currency),
			email: Some(email_status_label(&email)),
			tracking: Some(tracking),
		},
	};

	Json(response).into_response()
}
