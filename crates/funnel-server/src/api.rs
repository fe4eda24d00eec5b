// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use funnel_checkout::{CheckoutService, ProviderClient};
use funnel_config::AppConfig;
use funnel_facebook::FacebookClient;
use funnel_monitor::EventMonitor;
use funnel_smtp::SmtpClient;
use funnel_tiktok::TiktokClient;
use funnel_track::Tracker;

use crate::routes;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
	pub config: Arc<AppConfig>,
	pub monitor: Arc<EventMonitor>,
	pub facebook: Arc<FacebookClient>,
	pub tiktok: Arc<TiktokClient>,
	pub smtp: Option<Arc<SmtpClient>>,
	pub checkout: Arc<CheckoutService>,
}

/// Wire up clients, the shared event monitor and the checkout service.
///
/// An SMTP transport that fails to build downgrades email to disabled rather
/// than failing startup; every other component is infallible to construct
/// (missing credentials surface per call, not here).
pub fn create_app_state(config: AppConfig) -> AppState {
	let config = Arc::new(config);
	let monitor = Arc::new(EventMonitor::new());

	let facebook = Arc::new(FacebookClient::new(
		config.facebook.clone(),
		Arc::clone(&monitor),
	));
	let tiktok = Arc::new(TiktokClient::new(
		config.tiktok.clone(),
		Arc::clone(&monitor),
	));

	// The tracker gets its own client instances; all of them report into the
	// same monitor.
	let tracker = Arc::new(Tracker::new(
		FacebookClient::new(config.facebook.clone(), Arc::clone(&monitor)),
		TiktokClient::new(config.tiktok.clone(), Arc::clone(&monitor)),
	));

	let smtp = config.smtp.clone().and_then(|smtp_config| {
		match SmtpClient::new(smtp_config) {
			Ok(client) => Some(Arc::new(client)),
			Err(error) => {
				tracing::warn!(error = %error, "SMTP client unavailable, email disabled");
				None
			}
		}
	});

	let provider = ProviderClient::new(config.checkout.clone(), config.site.base_url.clone());
	let checkout = Arc::new(CheckoutService::new(
		provider,
		tracker,
		smtp.clone(),
		config.site.product_name.clone(),
		config.site.base_url.clone(),
	));

	AppState {
		config,
		monitor,
		facebook,
		tiktok,
		smtp,
		checkout,
	}
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/checkout", post(routes::checkout::begin_checkout))
		.route(
			"/api/checkout/confirm",
			post(routes::checkout::confirm_checkout),
		)
		.route(
			"/api/facebook-conversion",
			post(routes::conversions::facebook_conversion),
		)
		.route(
			"/api/tiktok-conversion",
			post(routes::conversions::tiktok_conversion),
		)
		.route(
			"/api/track/view-content",
			post(routes::pixel::track_view_content),
		)
		.route(
			"/api/track/button-click",
			post(routes::pixel::track_button_click),
		)
		.route("/api/monitor-events", get(routes::monitor::monitor_events))
		.with_state(state)
}
