// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checkout orchestration.
//!
//! Two flows, both with tracking as a best-effort side effect:
//!
//! - [`CheckoutService::begin`]: guard-check, fire InitiateCheckout once per
//!   visitor, then create the provider session. Only a session-creation
//!   failure is user-visible; tracking failures are logged and swallowed.
//! - [`CheckoutService::confirm`]: verify the session with the provider, and
//!   only for a paid+complete+positive session fire Purchase tracking and the
//!   confirmation email. An unverified session skips every side effect
//!   silently.

use std::sync::Arc;

use funnel_core::RequestContext;
use funnel_smtp::{is_valid_email, order_confirmation, SmtpClient, SmtpError};
use funnel_track::{CheckoutGuard, TrackSummary, Tracker};

use crate::order::{format_price, order_code};
use crate::provider::{CheckoutError, ProviderClient};

/// Outcome of starting a checkout.
#[derive(Debug)]
pub struct BeginOutcome {
	/// Provider-hosted payment page to navigate the browser to.
	pub url: String,
	/// Present only when this call won the once-per-visitor guard and
	/// actually fired InitiateCheckout.
	pub tracking: Option<TrackSummary>,
}

/// How the confirmation email went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailStatus {
	Sent,
	/// Send failed outright.
	Failed(String),
	/// The send exceeded its window; delivery is unknown, the purchase
	/// itself succeeded. Shown as "email delayed", not as a failure.
	TimedOut,
	/// No SMTP configured or the session carried no customer email.
	Disabled,
}

/// Outcome of confirming a checkout session.
#[derive(Debug)]
pub enum ConfirmOutcome {
	/// The provider does not report this session as a completed payment.
	/// No tracking fired, no email sent, nothing surfaced to the user.
	NotVerified,
	Confirmed {
		order_code: String,
		value: f64,
		currency: String,
		tracking: TrackSummary,
		email: EmailStatus,
	},
}

/// Orchestrates checkout against the provider, the tracking facade and the
/// mail boundary.
pub struct CheckoutService {
	provider: ProviderClient,
	tracker: Arc<Tracker>,
	guard: CheckoutGuard,
	smtp: Option<Arc<SmtpClient>>,
	product_name: String,
	site_url: String,
}

impl CheckoutService {
	pub fn new(
		provider: ProviderClient,
		tracker: Arc<Tracker>,
		smtp: Option<Arc<SmtpClient>>,
		product_name: impl Into<String>,
		site_url: impl Into<String>,
	) -> Self {
		Self {
			provider,
			tracker,
			guard: CheckoutGuard::new(),
			smtp,
			product_name: product_name.into(),
			site_url: site_url.into(),
		}
	}

	/// Start a checkout: track InitiateCheckout (once per `visitor_key`),
	/// then create the payment session.
	///
	/// The guard is set before the tracking calls are awaited, so a second
	/// click racing this one skips tracking and goes straight to session
	/// creation. A tracking failure never blocks the redirect; a session
	/// failure is returned and must be shown to the user.
	#[tracing::instrument(skip(self, context), fields(visitor = %visitor_key))]
	pub async fn begin(
		&self,
		visitor_key: &str,
		price_id: Option<&str>,
		quantity: u32,
		context: RequestContext,
	) -> Result<BeginOutcome, CheckoutError> {
		let tracking = if self.guard.begin(visitor_key) {
			Some(
				self.tracker
					.initiate_checkout(Some(self.product_name.clone()), context)
					.await,
			)
		} else {
			tracing::debug!("checkout already tracked for this visitor, skipping");
			None
		};

		let url = self.provider.create_session(price_id, quantity).await?;

		Ok(BeginOutcome { url, tracking })
	}

	/// Verify a completed session and fire the post-payment side effects.
	#[tracing::instrument(skip(self, context), fields(session = %session_id))]
	pub async fn confirm(
		&self,
		session_id: &str,
		context: RequestContext,
	) -> Result<ConfirmOutcome, CheckoutError> {
		let session = self.provider.get_session(session_id).await?;

		if !session.is_verified_paid() {
			tracing::info!(
				payment_status = %session.payment_status,
				status = %session.status,
				"session not verified paid, skipping tracking and email"
			);
			return Ok(ConfirmOutcome::NotVerified);
		}

		let code = order_code(session_id);
		let value = session.value().unwrap_or_default();
		let currency = session.currency_code();
		let identity = session.identity();
		let recipient = identity.email.clone();
		let amount_cents = session.amount_total.unwrap_or_default();

		let tracking = self
			.tracker
			.purchase(identity, value, &currency, session_id, context)
			.await;

		let email = self.send_confirmation(recipient.as_deref(), &code, amount_cents).await;

		Ok(ConfirmOutcome::Confirmed {
			order_code: code,
			value,
			currency,
			tracking,
			email,
		})
	}

	async fn send_confirmation(
		&self,
		recipient: Option<&str>,
		order_code: &str,
		amount_cents: i64,
	) -> EmailStatus {
		let (client, to) = match (&self.smtp, recipient) {
			(Some(client), Some(to)) if !to.is_empty() => (client, to),
			_ => return EmailStatus::Disabled,
		};

		// The provider reports whatever the customer typed; junk addresses
		// skip the transport instead of burning the send timeout.
		if !is_valid_email(to) {
			tracing::warn!("confirmation recipient address is malformed, skipping email");
			return EmailStatus::Failed("invalid recipient address".to_string());
		}

		let content = order_confirmation(
			order_code,
			&self.product_name,
			&format_price(amount_cents),
			&self.site_url,
		);

		match client.send_email(to, &content).await {
			Ok(()) => EmailStatus::Sent,
			Err(error @ SmtpError::Timeout { .. }) => {
				tracing::warn!(error = %error, "confirmation email timed out");
				EmailStatus::TimedOut
			}
			Err(error) => {
				tracing::warn!(error = %error, "confirmation email failed");
				EmailStatus::Failed(error.to_string())
			}
		}
	}
}
