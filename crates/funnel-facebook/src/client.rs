// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client for the Conversions API.

use std::sync::Arc;

use serde::Deserialize;

use funnel_config::FacebookConfig;
use funnel_core::{MarketingEvent, Platform};
use funnel_monitor::{EventMonitor, MonitorEntry};

use crate::payload::{FacebookEvent, FacebookPayload};

/// Errors from a Conversions API send attempt.
#[derive(Debug, thiserror::Error)]
pub enum FacebookError {
	/// A required credential is not configured. Fatal for this call only;
	/// no HTTP request is attempted.
	#[error("missing Facebook credential: {0}")]
	MissingCredential(&'static str),

	/// Facebook rejected the event (non-2xx response).
	#[error("Facebook API error ({status}): {body}")]
	Upstream { status: u16, body: String },

	/// The HTTP request itself failed (network error, timeout).
	#[error("HTTP request failed: {0}")]
	Transport(#[from] reqwest::Error),
}

/// Parsed Conversions API acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacebookResponse {
	#[serde(default)]
	pub events_received: Option<i64>,
	#[serde(default)]
	pub fbtrace_id: Option<String>,
}

/// Conversions API client.
///
/// Every send attempt, successful or not, lands in the shared event monitor
/// with PII-presence flags only.
pub struct FacebookClient {
	config: FacebookConfig,
	monitor: Arc<EventMonitor>,
	http: reqwest::Client,
}

impl FacebookClient {
	pub fn new(config: FacebookConfig, monitor: Arc<EventMonitor>) -> Self {
		Self {
			config,
			monitor,
			http: funnel_core::http::new_client(),
		}
	}

	/// Send one conversion event.
	///
	/// Returns a structured error rather than panicking in every failure
	/// mode; the caller decides whether the failure matters.
	#[tracing::instrument(skip(self, event), fields(event_name = %event.name, event_id = %event.event_id))]
	pub async fn send(&self, event: &MarketingEvent) -> Result<FacebookResponse, FacebookError> {
		let result = self.dispatch(event).await;

		match &result {
			Ok(response) => {
				tracing::info!(
					events_received = ?response.events_received,
					"Facebook conversion event sent"
				);
				self.record(event, true, None);
			}
			Err(error) => {
				tracing::warn!(error = %error, "Facebook conversion event failed");
				self.record(event, false, Some(error.to_string()));
			}
		}

		result
	}

	async fn dispatch(&self, event: &MarketingEvent) -> Result<FacebookResponse, FacebookError> {
		let pixel_id = self
			.config
			.pixel_id
			.as_deref()
			.ok_or(FacebookError::MissingCredential("pixel id"))?;
		let access_token = self
			.config
			.access_token
			.as_ref()
			.ok_or(FacebookError::MissingCredential("access token"))?;

		let payload = FacebookPayload {
			data: vec![FacebookEvent::from_marketing(event)],
			test_event_code: self.config.test_event_code.clone(),
		};

		let url = format!(
			"{}/{}/{}/events",
			self.config.base_url, self.config.api_version, pixel_id
		);

		let response = self
			.http
			.post(&url)
			.query(&[("access_token", access_token.expose())])
			.json(&payload)
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			return Err(FacebookError::Upstream {
				status: status.as_u16(),
				body,
			});
		}

		Ok(serde_json::from_str(&body).unwrap_or_default())
	}

	fn record(&self, event: &MarketingEvent, success: bool, error: Option<String>) {
		self.monitor.record(MonitorEntry {
			platform: Platform::Facebook,
			event_name: event.name.as_str().to_string(),
			event_id: event.event_id.clone(),
			success,
			host: event.context.host.clone().unwrap_or_default(),
			user_agent: event.context.user_agent.clone().unwrap_or_default(),
			has_email: event.identity.has_email(),
			has_phone: event.identity.has_phone(),
			value: event.value.map(|v| v.to_string()),
			currency: event.currency.clone(),
			error,
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use funnel_core::{Identity, RequestContext};
	use wiremock::matchers::{method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn config(base_url: &str) -> FacebookConfig {
		FacebookConfig {
			pixel_id: Some("px123".to_string()),
			access_token: Some(funnel_core::SecretString::new("fbtoken")),
			test_event_code: None,
			api_version: "v21.0".to_string(),
			base_url: base_url.to_string(),
		}
	}

	fn purchase() -> MarketingEvent {
		MarketingEvent::purchase(
			"evt-abc",
			Identity {
				email: Some("buyer@example.com".to_string()),
				..Identity::default()
			},
			14.99,
			"USD",
			"ORDER123",
			RequestContext {
				user_agent: Some("Mozilla/5.0".to_string()),
				host: Some("shop.example.com".to_string()),
				..RequestContext::default()
			},
		)
	}

	#[tokio::test]
	async fn send_posts_event_and_records_success() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/v21.0/px123/events"))
			.and(query_param("access_token", "fbtoken"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"events_received": 1,
				"fbtrace_id": "trace1"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let monitor = Arc::new(EventMonitor::new());
		let client = FacebookClient::new(config(&server.uri()), Arc::clone(&monitor));

		let response = client.send(&purchase()).await.unwrap();
		assert_eq!(response.events_received, Some(1));

		let report = monitor.query(None, 10);
		assert_eq!(report.stats.total, 1);
		assert_eq!(report.stats.facebook, 1);
		assert!(report.events[0].success);
		assert!(report.events[0].has_email);
		assert!(!report.events[0].has_phone);
		assert_eq!(report.events[0].value.as_deref(), Some("14.99"));
	}

	#[tokio::test]
	async fn sent_body_contains_hashed_email_and_event_id() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
			.mount(&server)
			.await;

		let monitor = Arc::new(EventMonitor::new());
		let client = FacebookClient::new(config(&server.uri()), monitor);
		client.send(&purchase()).await.unwrap();

		let requests = server.received_requests().await.unwrap();
		let body: serde_json::Value = requests[0].body_json().unwrap();
		let event = &body["data"][0];
		assert_eq!(event["event_id"], "evt-abc");
		assert_eq!(event["action_source"], "website");
		assert_eq!(
			event["user_data"]["em"][0],
			funnel_core::hash_pii("buyer@example.com")
		);
		// The raw address must not appear anywhere in the payload.
		assert!(!body.to_string().contains("buyer@example.com"));
	}

	#[tokio::test]
	async fn upstream_rejection_is_structured_and_recorded() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(
				ResponseTemplate::new(400)
					.set_body_json(serde_json::json!({"error": "invalid token"})),
			)
			.mount(&server)
			.await;

		let monitor = Arc::new(EventMonitor::new());
		let client = FacebookClient::new(config(&server.uri()), Arc::clone(&monitor));

		let error = client.send(&purchase()).await.unwrap_err();
		match &error {
			FacebookError::Upstream { status, body } => {
				assert_eq!(*status, 400);
				assert!(body.contains("invalid token"));
			}
			other => panic!("expected upstream error, got {other:?}"),
		}

		let report = monitor.query(None, 10);
		assert_eq!(report.stats.failed, 1);
		assert!(report.events[0].error.as_ref().unwrap().contains("invalid token"));
	}

	#[tokio::test]
	async fn missing_credential_short_circuits_without_http() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200))
			.expect(0)
			.mount(&server)
			.await;

		let mut cfg = config(&server.uri());
		cfg.access_token = None;

		let monitor = Arc::new(EventMonitor::new());
		let client = FacebookClient::new(cfg, Arc::clone(&monitor));

		let error = client.send(&purchase()).await.unwrap_err();
		assert!(matches!(error, FacebookError::MissingCredential("access token")));

		// The attempt is still visible to operations.
		let report = monitor.query(None, 10);
		assert_eq!(report.stats.failed, 1);
	}
}
