// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP API tests driven through the router with `tower::ServiceExt`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use funnel_config::AppConfig;
use funnel_core::Platform;
use funnel_monitor::MonitorEntry;
use funnel_server::{create_app_state, create_router, AppState};

fn test_state(platform_url: Option<&str>) -> AppState {
	let platform_url = platform_url.map(str::to_string);
	let lookup = move |key: &str| match key {
		"FUNNEL_MONITOR_AUTH_KEY" => Some("ops-secret".to_string()),
		"FUNNEL_FACEBOOK_PIXEL_ID" => Some("px".to_string()),
		"FUNNEL_FACEBOOK_ACCESS_TOKEN" => Some("fbtok".to_string()),
		"FUNNEL_FACEBOOK_BASE_URL" => platform_url.clone(),
		"FUNNEL_TIKTOK_PIXEL_ID" => Some("ttpx".to_string()),
		"FUNNEL_TIKTOK_ACCESS_TOKEN" => Some("tttok".to_string()),
		"FUNNEL_TIKTOK_ADVERTISER_ID" => Some("adv".to_string()),
		"FUNNEL_TIKTOK_BASE_URL" => platform_url.clone(),
		_ => None,
	};
	create_app_state(AppConfig::from_lookup(&lookup).unwrap())
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

fn entry(platform: Platform, success: bool) -> MonitorEntry {
	MonitorEntry {
		platform,
		event_name: "Purchase".to_string(),
		event_id: "evt-1".to_string(),
		success,
		host: "shop.example.com".to_string(),
		user_agent: "Mozilla/5.0".to_string(),
		has_email: true,
		has_phone: false,
		value: Some("14.99".to_string()),
		currency: Some("USD".to_string()),
		error: (!success).then(|| "invalid token".to_string()),
	}
}

#[tokio::test]
async fn health_reports_configured_integrations() {
	let app = create_router(test_state(None));
	let response = app
		.oneshot(Request::get("/health").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["status"], "ok");
	assert_eq!(body["facebook_configured"], true);
	assert_eq!(body["tiktok_configured"], true);
	assert_eq!(body["smtp_enabled"], false);
	// No SMTP configured, so no connectivity verdict either.
	assert!(body.get("smtp_healthy").is_none());
	assert_eq!(body["checkout_configured"], false);
}

#[tokio::test]
async fn monitor_rejects_missing_or_wrong_bearer() {
	let state = test_state(None);

	let response = create_router(state.clone())
		.oneshot(Request::get("/api/monitor-events").body(Body::empty()).unwrap())
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	let body = json_body(response).await;
	assert_eq!(body["error"], "unauthorized");
	assert!(body.get("events").is_none());

	let response = create_router(state)
		.oneshot(
			Request::get("/api/monitor-events")
				.header("authorization", "Bearer wrong-key")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn monitor_query_filters_by_platform_but_keeps_global_stats() {
	let state = test_state(None);
	state.monitor.record(entry(Platform::Facebook, true));
	state.monitor.record(entry(Platform::TikTok, true));
	state.monitor.record(entry(Platform::TikTok, false));

	let response = create_router(state)
		.oneshot(
			Request::get("/api/monitor-events?platform=Facebook&limit=5")
				.header("authorization", "Bearer ops-secret")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	// Stats cover the whole buffer; the filter shapes the event slice only.
	assert_eq!(body["stats"]["total"], 3);
	assert_eq!(body["stats"]["facebook"], 1);
	assert_eq!(body["stats"]["tiktok"], 2);
	assert_eq!(body["stats"]["failed"], 1);
	let events = body["events"].as_array().unwrap();
	assert_eq!(events.len(), 1);
	assert_eq!(events[0]["platform"], "Facebook");
}

#[tokio::test]
async fn monitor_rejects_unknown_platform_filter() {
	let response = create_router(test_state(None))
		.oneshot(
			Request::get("/api/monitor-events?platform=Snapchat")
				.header("authorization", "Bearer ops-secret")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pixel_descriptors_are_returned_without_platform_calls() {
	let state = test_state(None);

	let response = create_router(state.clone())
		.oneshot(post_json(
			"/api/track/view-content",
			serde_json::json!({"content_name": "Bundle"}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["event_name"], "ViewContent");
	assert_eq!(body["event_id"].as_str().unwrap().len(), 32);
	assert_eq!(body["content_name"], "Bundle");

	let response = create_router(state.clone())
		.oneshot(post_json(
			"/api/track/button-click",
			serde_json::json!({"location": "hero", "text": "Buy Now"}),
		))
		.await
		.unwrap();
	let body = json_body(response).await;
	assert_eq!(body["event_name"], "InitiateCheckout");
	assert!(body["content_category"]
		.as_str()
		.unwrap()
		.contains("Purchase Intent"));

	// No server-side sends happened, so the monitor stays empty.
	assert_eq!(state.monitor.query(None, 10).stats.total, 0);
}

#[tokio::test]
async fn pixel_descriptors_carry_a_facebook_attribution_verdict() {
	let state = test_state(None);

	let response = create_router(state.clone())
		.oneshot(post_json(
			"/api/track/view-content",
			serde_json::json!({"content_name": "Bundle", "query": "fbclid=abc123"}),
		))
		.await
		.unwrap();
	let body = json_body(response).await;
	assert_eq!(body["facebook_attributed"], true);

	let response = create_router(state.clone())
		.oneshot(post_json(
			"/api/track/button-click",
			serde_json::json!({
				"location": "hero",
				"text": "Buy Now",
				"referrer": "https://m.facebook.com/"
			}),
		))
		.await
		.unwrap();
	let body = json_body(response).await;
	assert_eq!(body["facebook_attributed"], true);

	// Organic traffic gets the descriptor but no Facebook go-ahead.
	let response = create_router(state)
		.oneshot(post_json(
			"/api/track/view-content",
			serde_json::json!({
				"content_name": "Bundle",
				"query": "ref=newsletter",
				"referrer": "https://example.com/blog"
			}),
		))
		.await
		.unwrap();
	let body = json_body(response).await;
	assert_eq!(body["facebook_attributed"], false);
	assert_eq!(body["event_name"], "ViewContent");
}

#[tokio::test]
async fn facebook_conversion_echoes_client_event_id() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
		.expect(1)
		.mount(&server)
		.await;

	let response = create_router(test_state(Some(&server.uri())))
		.oneshot(post_json(
			"/api/facebook-conversion",
			serde_json::json!({
				"event_name": "Purchase",
				"event_id": "pixel-evt-42",
				"email": "buyer@example.com",
				"value": 14.99,
				"currency": "USD",
				"order_id": "cs_live_x9y8z7w6"
			}),
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["success"], true);
	assert_eq!(body["event_id"], "pixel-evt-42");

	let requests = server.received_requests().await.unwrap();
	let sent: serde_json::Value = requests[0].body_json().unwrap();
	assert_eq!(sent["data"][0]["event_id"], "pixel-evt-42");
}

#[tokio::test]
async fn tiktok_conversion_failure_resolves_with_success_false() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(
			ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "invalid token"})),
		)
		.mount(&server)
		.await;

	let state = test_state(Some(&server.uri()));
	let response = create_router(state.clone())
		.oneshot(post_json(
			"/api/tiktok-conversion",
			serde_json::json!({"event_name": "InitiateCheckout"}),
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["success"], false);
	assert!(body["error"].as_str().unwrap().contains("invalid token"));

	let report = state.monitor.query(None, 10);
	assert_eq!(report.stats.failed, 1);
}

#[tokio::test]
async fn unknown_event_name_is_rejected_without_a_send() {
	let response = create_router(test_state(None))
		.oneshot(post_json(
			"/api/facebook-conversion",
			serde_json::json!({"event_name": "AddToCart"}),
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["success"], false);
	assert!(body["error"].as_str().unwrap().contains("AddToCart"));
}
