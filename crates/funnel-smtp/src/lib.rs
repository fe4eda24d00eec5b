// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Async SMTP client for order confirmation email.
//!
//! Sends multipart (HTML + plain text) email over STARTTLS using [`lettre`].
//! Every send is bounded by the configured timeout so a hung SMTP server
//! cannot stall the checkout confirmation flow; an elapsed timeout surfaces
//! as the distinct [`SmtpError::Timeout`] variant rather than a generic send
//! failure, because operationally they mean different things (the message may
//! still have been delivered).
//!
//! Email is an optional concern: when no SMTP host is configured the rest of
//! the system runs without this crate's client ever being constructed.

use std::future::Future;
use std::time::Duration;

use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use funnel_config::SmtpConfig;

mod template;

pub use template::{order_confirmation, EmailContent};

/// Errors from SMTP operations.
#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
	/// Failed to connect to the SMTP server.
	#[error("connection failed: {0}")]
	Connection(String),

	/// Failed to send an email message.
	#[error("send failed: {0}")]
	Send(String),

	/// Invalid email address format.
	#[error("invalid email address: {0}")]
	Address(String),

	/// The send did not complete within the configured window. The message
	/// may or may not have been delivered.
	#[error("email send timed out after {secs}s")]
	Timeout { secs: u64 },
}

impl SmtpError {
	pub fn is_timeout(&self) -> bool {
		matches!(self, SmtpError::Timeout { .. })
	}
}

/// Async SMTP client.
///
/// Built once from [`SmtpConfig`] and reused; [`lettre`] pools connections
/// internally, and the actual connection is made lazily on first send.
pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
	timeout: Duration,
}

impl SmtpClient {
	/// Build the transport from configuration.
	///
	/// Returns [`SmtpError::Address`] if the from address is invalid and
	/// [`SmtpError::Connection`] if the TLS relay cannot be set up.
	#[tracing::instrument(
		skip(config),
		fields(host = %config.host, port = config.port, use_tls = config.use_tls)
	)]
	pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
		let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let builder = if config.use_tls {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
		};

		let mut builder = builder.port(config.port);

		if let (Some(username), Some(password)) = (config.username, config.password) {
			builder = builder.credentials(Credentials::new(username, password.into_inner()));
		}

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport: builder.build(),
			from_mailbox,
			timeout: Duration::from_secs(config.timeout_secs),
		})
	}

	/// Test connectivity to the SMTP server.
	#[tracing::instrument(skip(self))]
	pub async fn check_health(&self) -> Result<(), SmtpError> {
		self.transport
			.test_connection()
			.await
			.map_err(|e| SmtpError::Connection(format!("{e}")))?;
		Ok(())
	}

	/// Send a multipart email, bounded by the configured timeout.
	///
	/// The recipient's client picks the HTML or plain text part. An elapsed
	/// timeout returns [`SmtpError::Timeout`] without cancelling any delivery
	/// the server may already have accepted.
	#[tracing::instrument(skip(self, content), fields(subject = %content.subject))]
	pub async fn send_email(&self, to: &str, content: &EmailContent) -> Result<(), SmtpError> {
		let to_mailbox: Mailbox = to.parse().map_err(|e| SmtpError::Address(format!("{e}")))?;

		let message = Message::builder()
			.from(self.from_mailbox.clone())
			.to(to_mailbox)
			.subject(&content.subject)
			.multipart(
				MultiPart::alternative()
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_PLAIN)
							.body(content.text.clone()),
					)
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_HTML)
							.body(content.html.clone()),
					),
			)
			.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))?;

		let send = async {
			self.transport
				.send(message)
				.await
				.map(|_| ())
				.map_err(|e| SmtpError::Send(format!("{e}")))
		};

		with_timeout(self.timeout, send).await?;

		tracing::info!("email sent");
		Ok(())
	}
}

/// Bound `fut` by `timeout`, mapping an elapsed timer to [`SmtpError::Timeout`].
async fn with_timeout<F>(timeout: Duration, fut: F) -> Result<(), SmtpError>
where
	F: Future<Output = Result<(), SmtpError>>,
{
	match tokio::time::timeout(timeout, fut).await {
		Ok(result) => result,
		Err(_) => Err(SmtpError::Timeout {
			secs: timeout.as_secs(),
		}),
	}
}

/// Whether an email address is syntactically valid.
///
/// Format validation only; says nothing about deliverability.
pub fn is_valid_email(email: &str) -> bool {
	email.parse::<Mailbox>().is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	mod email_validation {
		use super::*;

		#[test]
		fn accepts_common_forms() {
			assert!(is_valid_email("user@example.com"));
			assert!(is_valid_email("User Name <user@example.com>"));
			assert!(is_valid_email("user+tag@mail.example.com"));
		}

		#[test]
		fn rejects_malformed_addresses() {
			assert!(!is_valid_email(""));
			assert!(!is_valid_email("userexample.com"));
			assert!(!is_valid_email("user@"));
			assert!(!is_valid_email("@example.com"));
			assert!(!is_valid_email("user@@example.com"));
		}
	}

	mod timeout_behavior {
		use super::*;

		#[tokio::test(start_paused = true)]
		async fn elapsed_timer_is_the_distinct_timeout_variant() {
			let never = async {
				tokio::time::sleep(Duration::from_secs(3600)).await;
				Ok(())
			};

			let error = with_timeout(Duration::from_secs(15), never).await.unwrap_err();
			assert!(error.is_timeout());
			assert_eq!(error.to_string(), "email send timed out after 15s");
		}

		#[tokio::test]
		async fn prompt_completion_passes_through() {
			let result = with_timeout(Duration::from_secs(15), async { Ok(()) }).await;
			assert!(result.is_ok());

			let result = with_timeout(Duration::from_secs(15), async {
				Err(SmtpError::Send("mailbox full".to_string()))
			})
			.await;
			let error = result.unwrap_err();
			assert!(!error.is_timeout());
			assert!(error.to_string().contains("mailbox full"));
		}
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn simple_addresses_are_accepted(
				local in "[a-zA-Z][a-zA-Z0-9]{0,30}",
				domain in "[a-zA-Z][a-zA-Z0-9]{0,20}",
				tld in "(com|org|net|io|dev)"
			) {
				let email = format!("{local}@{domain}.{tld}");
				prop_assert!(is_valid_email(&email), "expected valid: {}", email);
			}

			#[test]
			fn missing_at_symbol_is_invalid(s in "[a-zA-Z0-9._%+-]{1,50}") {
				prop_assume!(!s.contains('@'));
				prop_assert!(!is_valid_email(&s));
			}
		}
	}
}
