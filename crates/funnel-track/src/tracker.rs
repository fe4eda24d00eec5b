// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server-side dispatch to both ad platforms.

use serde::Serialize;

use funnel_core::{generate_event_id, Identity, MarketingEvent, RequestContext};
use funnel_facebook::FacebookClient;
use funnel_tiktok::TiktokClient;

/// Outcome of one platform dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum DispatchStatus {
	Sent,
	Failed(String),
}

impl DispatchStatus {
	pub fn is_sent(&self) -> bool {
		matches!(self, DispatchStatus::Sent)
	}
}

/// Per-platform outcome summary for one logical user action.
///
/// Always a value, never an error: platform failures land in the event
/// monitor and here as [`DispatchStatus::Failed`], and must not interrupt the
/// caller's flow.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
	/// The dedup id shared by every call (and pixel) for this action.
	pub event_id: String,
	pub facebook: DispatchStatus,
	pub tiktok: DispatchStatus,
}

impl TrackSummary {
	pub fn any_sent(&self) -> bool {
		self.facebook.is_sent() || self.tiktok.is_sent()
	}
}

/// Dispatches conversion events to both platforms concurrently.
pub struct Tracker {
	facebook: FacebookClient,
	tiktok: TiktokClient,
}

impl Tracker {
	pub fn new(facebook: FacebookClient, tiktok: TiktokClient) -> Self {
		Self { facebook, tiktok }
	}

	/// Fire InitiateCheckout on both platforms.
	///
	/// No monetary value is attached; checkout initiation is not a confirmed
	/// monetary event. Callers gate this behind [`crate::CheckoutGuard`] so
	/// it fires at most once per checkout attempt.
	#[tracing::instrument(skip_all)]
	pub async fn initiate_checkout(
		&self,
		content_name: Option<String>,
		context: RequestContext,
	) -> TrackSummary {
		let event_id = generate_event_id();
		let event = MarketingEvent::initiate_checkout(event_id.clone(), context)
			.with_content(content_name, None, None);
		self.dispatch(event_id, &event).await
	}

	/// Fire Purchase on both platforms (TikTok receives `CompletePayment`).
	///
	/// Callers must have verified with the payment provider that the session
	/// is paid and complete with a positive amount before invoking this;
	/// optimizing ad delivery toward unpaid traffic is worse than dropping
	/// the event.
	#[tracing::instrument(skip_all, fields(order_id = %order_id))]
	pub async fn purchase(
		&self,
		identity: Identity,
		value: f64,
		currency: &str,
		order_id: &str,
		context: RequestContext,
	) -> TrackSummary {
		let event_id = generate_event_id();
		let event = MarketingEvent::purchase(
			event_id.clone(),
			identity,
			value,
			currency,
			order_id,
			context,
		);
		self.dispatch(event_id, &event).await
	}

	/// Dispatch a pre-built event to both platforms under its own id.
	pub async fn send(&self, event: &MarketingEvent) -> TrackSummary {
		self.dispatch(event.event_id.clone(), event).await
	}

	async fn dispatch(&self, event_id: String, event: &MarketingEvent) -> TrackSummary {
		// Both platforms receive the same event id so their dedup windows can
		// collapse a paired pixel call into one counted conversion.
		let (facebook, tiktok) = tokio::join!(self.facebook.send(event), self.tiktok.send(event));

		let summary = TrackSummary {
			event_id,
			facebook: match facebook {
				Ok(_) => DispatchStatus::Sent,
				Err(e) => DispatchStatus::Failed(e.to_string()),
			},
			tiktok: match tiktok {
				Ok(_) => DispatchStatus::Sent,
				Err(e) => DispatchStatus::Failed(e.to_string()),
			},
		};

		if !summary.any_sent() {
			tracing::warn!(event = %event.name, "all platform dispatches failed");
		}

		summary
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	use funnel_config::{FacebookConfig, TiktokConfig};
	use funnel_monitor::EventMonitor;
	use wiremock::matchers::{method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	async fn tracker_against(server: &MockServer) -> (Tracker, Arc<EventMonitor>) {
		let monitor = Arc::new(EventMonitor::new());
		let facebook = FacebookClient::new(
			FacebookConfig {
				pixel_id: Some("px".to_string()),
				access_token: Some(funnel_core::SecretString::new("fbtok")),
				test_event_code: None,
				api_version: "v21.0".to_string(),
				base_url: server.uri(),
			},
			Arc::clone(&monitor),
		);
		let tiktok = TiktokClient::new(
			TiktokConfig {
				pixel_id: Some("ttpx".to_string()),
				access_token: Some(funnel_core::SecretString::new("tttok")),
				advertiser_id: Some("adv".to_string()),
				base_url: server.uri(),
			},
			Arc::clone(&monitor),
		);
		(Tracker::new(facebook, tiktok), monitor)
	}

	#[tokio::test]
	async fn initiate_checkout_shares_one_event_id_across_platforms() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
			.expect(2)
			.mount(&server)
			.await;

		let (tracker, monitor) = tracker_against(&server).await;
		let summary = tracker
			.initiate_checkout(Some("Checkout".to_string()), Default::default())
			.await;

		assert!(summary.facebook.is_sent());
		assert!(summary.tiktok.is_sent());

		let requests = server.received_requests().await.unwrap();
		assert_eq!(requests.len(), 2);

		let ids: Vec<String> = requests
			.iter()
			.map(|req| {
				let body: serde_json::Value = req.body_json().unwrap();
				body["data"][0]["event_id"].as_str().unwrap().to_string()
			})
			.collect();
		assert_eq!(ids[0], ids[1]);
		assert_eq!(ids[0], summary.event_id);

		// Neither payload carries a monetary value.
		for req in &requests {
			let body: serde_json::Value = req.body_json().unwrap();
			let rendered = body.to_string();
			assert!(!rendered.contains("\"value\""));
			assert!(!rendered.contains("\"currency\""));
		}

		assert_eq!(monitor.query(None, 10).stats.total, 2);
	}

	#[tokio::test]
	async fn platform_failure_resolves_to_summary_not_panic() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/open_api/v1.3/event/track/"))
			.respond_with(
				ResponseTemplate::new(400)
					.set_body_json(serde_json::json!({"error": "invalid token"})),
			)
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(path("/v21.0/px/events"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
			.mount(&server)
			.await;

		let (tracker, monitor) = tracker_against(&server).await;
		let summary = tracker
			.purchase(
				Identity::default(),
				14.99,
				"USD",
				"ORDER123",
				Default::default(),
			)
			.await;

		assert!(summary.facebook.is_sent());
		match &summary.tiktok {
			DispatchStatus::Failed(detail) => assert!(detail.contains("invalid token")),
			other => panic!("expected failure, got {other:?}"),
		}

		let report = monitor.query(None, 10);
		assert_eq!(report.stats.successful, 1);
		assert_eq!(report.stats.failed, 1);
	}
}
