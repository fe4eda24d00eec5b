// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client for the hosted checkout provider.
//!
//! Stripe-compatible wire format: form-encoded requests, Bearer auth, and the
//! checkout-session resource shape. Only the two calls the orchestration flow
//! needs are implemented.

use serde::Deserialize;

use funnel_config::CheckoutConfig;
use funnel_core::Identity;

/// Errors from checkout provider calls.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
	/// A required credential or setting is not configured.
	#[error("missing checkout configuration: {0}")]
	MissingCredential(&'static str),

	/// The provider rejected the request (non-2xx response).
	#[error("checkout provider error ({status}): {body}")]
	Upstream { status: u16, body: String },

	/// The HTTP request itself failed.
	#[error("HTTP request failed: {0}")]
	Transport(#[from] reqwest::Error),

	/// The provider accepted the session but returned no redirect URL.
	#[error("checkout session created without a redirect URL")]
	MissingSessionUrl,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
	#[serde(default)]
	url: Option<String>,
	#[serde(default)]
	id: Option<String>,
}

/// Customer address fields returned with a completed session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerAddress {
	pub country: Option<String>,
	pub city: Option<String>,
	pub state: Option<String>,
	pub postal_code: Option<String>,
}

/// Customer contact details returned with a completed session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
	pub email: Option<String>,
	pub name: Option<String>,
	pub phone: Option<String>,
	#[serde(default)]
	pub address: Option<CustomerAddress>,
}

/// A checkout session as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDetails {
	pub payment_status: String,
	pub status: String,
	/// Charged amount in the currency's minor unit (cents).
	#[serde(default)]
	pub amount_total: Option<i64>,
	#[serde(default)]
	pub currency: Option<String>,
	#[serde(default)]
	pub customer_details: Option<CustomerDetails>,
}

impl SessionDetails {
	/// Whether this session represents a confirmed, positive-amount payment.
	///
	/// All three conditions must hold; purchase tracking against anything
	/// less optimizes ad delivery toward non-paying traffic.
	pub fn is_verified_paid(&self) -> bool {
		self.payment_status == "paid"
			&& self.status == "complete"
			&& self.amount_total.is_some_and(|total| total > 0)
	}

	/// Charged amount in major units (1499 cents becomes 14.99).
	pub fn value(&self) -> Option<f64> {
		self.amount_total.map(|total| total as f64 / 100.0)
	}

	/// Uppercased currency code, defaulting to USD when absent.
	pub fn currency_code(&self) -> String {
		self.currency
			.as_deref()
			.map(str::to_uppercase)
			.unwrap_or_else(|| "USD".to_string())
	}

	/// Contact fields for purchase tracking, hashed downstream by adapters.
	pub fn identity(&self) -> Identity {
		let details = match &self.customer_details {
			Some(details) => details,
			None => return Identity::default(),
		};
		let (first_name, last_name) = crate::order::split_name(details.name.as_deref());
		let address = details.address.clone().unwrap_or_default();

		Identity {
			email: details.email.clone(),
			phone: details.phone.clone(),
			first_name,
			last_name,
			country: address.country,
			city: address.city,
			state: address.state,
			postal_code: address.postal_code,
		}
	}
}

/// Checkout provider client.
pub struct ProviderClient {
	config: CheckoutConfig,
	site_base_url: String,
	http: reqwest::Client,
}

impl ProviderClient {
	pub fn new(config: CheckoutConfig, site_base_url: impl Into<String>) -> Self {
		Self {
			config,
			site_base_url: site_base_url.into(),
			http: funnel_core::http::new_client(),
		}
	}

	/// Create a hosted checkout session and return its redirect URL.
	///
	/// `price_id` overrides the configured default price when given. The
	/// success URL carries the provider's session id placeholder so the
	/// confirmation page can verify the payment afterwards.
	#[tracing::instrument(skip(self))]
	pub async fn create_session(
		&self,
		price_id: Option<&str>,
		quantity: u32,
	) -> Result<String, CheckoutError> {
		let secret_key = self
			.config
			.secret_key
			.as_ref()
			.ok_or(CheckoutError::MissingCredential("secret key"))?;
		let price = price_id
			.or(self.config.price_id.as_deref())
			.ok_or(CheckoutError::MissingCredential("price id"))?;

		let quantity = quantity.max(1).to_string();
		let success_url = format!(
			"{}/success?session_id={{CHECKOUT_SESSION_ID}}",
			self.site_base_url
		);
		let cancel_url = format!("{}/", self.site_base_url);

		let form = [
			("mode", "payment"),
			("line_items[0][price]", price),
			("line_items[0][quantity]", quantity.as_str()),
			("success_url", success_url.as_str()),
			("cancel_url", cancel_url.as_str()),
		];

		let response = self
			.http
			.post(format!("{}/v1/checkout/sessions", self.config.base_url))
			.bearer_auth(secret_key.expose())
			.form(&form)
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;
		if !status.is_success() {
			return Err(CheckoutError::Upstream {
				status: status.as_u16(),
				body,
			});
		}

		let created: CreatedSession =
			serde_json::from_str(&body).unwrap_or(CreatedSession { url: None, id: None });

		tracing::info!(session_id = ?created.id, "checkout session created");

		created.url.ok_or(CheckoutError::MissingSessionUrl)
	}

	/// Fetch a session for post-payment verification.
	#[tracing::instrument(skip(self))]
	pub async fn get_session(&self, session_id: &str) -> Result<SessionDetails, CheckoutError> {
		let secret_key = self
			.config
			.secret_key
			.as_ref()
			.ok_or(CheckoutError::MissingCredential("secret key"))?;

		let response = self
			.http
			.get(format!(
				"{}/v1/checkout/sessions/{}",
				self.config.base_url, session_id
			))
			.bearer_auth(secret_key.expose())
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;
		if !status.is_success() {
			return Err(CheckoutError::Upstream {
				status: status.as_u16(),
				body,
			});
		}

		Ok(serde_json::from_str(&body).map_err(|e| CheckoutError::Upstream {
			status: status.as_u16(),
			body: format!("unparseable session: {e}"),
		})?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn paid_session() -> SessionDetails {
		SessionDetails {
			payment_status: "paid".to_string(),
			status: "complete".to_string(),
			amount_total: Some(1499),
			currency: Some("usd".to_string()),
			customer_details: Some(CustomerDetails {
				email: Some("buyer@example.com".to_string()),
				name: Some("Ada Lovelace".to_string()),
				phone: Some("+1 (555) 010-2030".to_string()),
				address: Some(CustomerAddress {
					country: Some("US".to_string()),
					city: Some("Portland".to_string()),
					state: Some("OR".to_string()),
					postal_code: Some("97201".to_string()),
				}),
			}),
		}
	}

	#[test]
	fn verification_requires_paid_complete_and_positive_amount() {
		assert!(paid_session().is_verified_paid());

		let mut open = paid_session();
		open.status = "open".to_string();
		assert!(!open.is_verified_paid());

		let mut unpaid = paid_session();
		unpaid.payment_status = "unpaid".to_string();
		assert!(!unpaid.is_verified_paid());

		let mut zero = paid_session();
		zero.amount_total = Some(0);
		assert!(!zero.is_verified_paid());

		let mut missing = paid_session();
		missing.amount_total = None;
		assert!(!missing.is_verified_paid());
	}

	#[test]
	fn amount_converts_to_major_units() {
		assert_eq!(paid_session().value(), Some(14.99));
		assert_eq!(paid_session().currency_code(), "USD");
	}

	#[test]
	fn identity_maps_name_and_address_fields() {
		let identity = paid_session().identity();
		assert_eq!(identity.email.as_deref(), Some("buyer@example.com"));
		assert_eq!(identity.first_name.as_deref(), Some("Ada"));
		assert_eq!(identity.last_name.as_deref(), Some("Lovelace"));
		assert_eq!(identity.postal_code.as_deref(), Some("97201"));

		let mut bare = paid_session();
		bare.customer_details = None;
		assert!(bare.identity().is_empty());
	}
}
