// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-concern configuration sections.

use funnel_core::SecretString;

use crate::error::ConfigError;

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// HTTP server bind settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
}

impl HttpConfig {
	/// - `FUNNEL_HTTP_HOST` (optional, default: `0.0.0.0`)
	/// - `FUNNEL_HTTP_PORT` (optional, default: `8080`)
	pub fn from_lookup(lookup: Lookup) -> Result<Self, ConfigError> {
		let host = lookup("FUNNEL_HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
		let port = match lookup("FUNNEL_HTTP_PORT") {
			Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
				key: "FUNNEL_HTTP_PORT".to_string(),
				message: format!("'{raw}' is not a valid port number"),
			})?,
			None => 8080,
		};
		Ok(Self { host, port })
	}
}

/// Facebook Conversions API credentials.
///
/// Credentials are optional: the adapter reports a per-call configuration
/// error when one it needs is missing.
#[derive(Debug, Clone)]
pub struct FacebookConfig {
	pub pixel_id: Option<String>,
	pub access_token: Option<SecretString>,
	pub test_event_code: Option<String>,
	pub api_version: String,
	pub base_url: String,
}

impl FacebookConfig {
	/// - `FUNNEL_FACEBOOK_PIXEL_ID`
	/// - `FUNNEL_FACEBOOK_ACCESS_TOKEN`
	/// - `FUNNEL_FACEBOOK_TEST_EVENT_CODE` (optional, non-production verification)
	/// - `FUNNEL_FACEBOOK_API_VERSION` (optional, default: `v21.0`)
	/// - `FUNNEL_FACEBOOK_BASE_URL` (optional, default: `https://graph.facebook.com`)
	pub fn from_lookup(lookup: Lookup) -> Self {
		Self {
			pixel_id: lookup("FUNNEL_FACEBOOK_PIXEL_ID"),
			access_token: lookup("FUNNEL_FACEBOOK_ACCESS_TOKEN").map(SecretString::new),
			test_event_code: lookup("FUNNEL_FACEBOOK_TEST_EVENT_CODE"),
			api_version: lookup("FUNNEL_FACEBOOK_API_VERSION")
				.unwrap_or_else(|| "v21.0".to_string()),
			base_url: lookup("FUNNEL_FACEBOOK_BASE_URL")
				.unwrap_or_else(|| "https://graph.facebook.com".to_string()),
		}
	}

	pub fn is_configured(&self) -> bool {
		self.pixel_id.is_some() && self.access_token.is_some()
	}
}

/// TikTok Events API credentials.
#[derive(Debug, Clone)]
pub struct TiktokConfig {
	pub pixel_id: Option<String>,
	pub access_token: Option<SecretString>,
	pub advertiser_id: Option<String>,
	pub base_url: String,
}

impl TiktokConfig {
	/// - `FUNNEL_TIKTOK_PIXEL_ID`
	/// - `FUNNEL_TIKTOK_ACCESS_TOKEN`
	/// - `FUNNEL_TIKTOK_ADVERTISER_ID`
	/// - `FUNNEL_TIKTOK_BASE_URL` (optional, default: `https://business-api.tiktok.com`)
	pub fn from_lookup(lookup: Lookup) -> Self {
		Self {
			pixel_id: lookup("FUNNEL_TIKTOK_PIXEL_ID"),
			access_token: lookup("FUNNEL_TIKTOK_ACCESS_TOKEN").map(SecretString::new),
			advertiser_id: lookup("FUNNEL_TIKTOK_ADVERTISER_ID"),
			base_url: lookup("FUNNEL_TIKTOK_BASE_URL")
				.unwrap_or_else(|| "https://business-api.tiktok.com".to_string()),
		}
	}

	pub fn is_configured(&self) -> bool {
		self.pixel_id.is_some() && self.access_token.is_some() && self.advertiser_id.is_some()
	}
}

/// Event monitor dashboard access.
///
/// The monitor is operational visibility, not a security boundary; the key
/// falls back to a fixed default when unconfigured.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
	pub auth_key: SecretString,
}

impl MonitorConfig {
	/// - `FUNNEL_MONITOR_AUTH_KEY` (optional, default: `monitor-key-123`)
	pub fn from_lookup(lookup: Lookup) -> Self {
		Self {
			auth_key: SecretString::new(
				lookup("FUNNEL_MONITOR_AUTH_KEY").unwrap_or_else(|| "monitor-key-123".to_string()),
			),
		}
	}
}

/// SMTP settings for the transactional confirmation email.
///
/// The whole section is optional; when `FUNNEL_SMTP_HOST` is unset no email
/// is sent and the confirm flow reports the email as disabled.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub from_address: String,
	pub from_name: String,
	pub use_tls: bool,
	/// Bounded wait for a single send before reporting a timeout.
	pub timeout_secs: u64,
}

impl SmtpConfig {
	/// - `FUNNEL_SMTP_HOST` (section enabled when present)
	/// - `FUNNEL_SMTP_PORT` (optional, default: `587`)
	/// - `FUNNEL_SMTP_USERNAME` / `FUNNEL_SMTP_PASSWORD` (optional)
	/// - `FUNNEL_SMTP_FROM_ADDRESS` (required when section enabled)
	/// - `FUNNEL_SMTP_FROM_NAME` (optional, default: `Funnel`)
	/// - `FUNNEL_SMTP_USE_TLS` (optional, default: `true`)
	/// - `FUNNEL_SMTP_TIMEOUT_SECS` (optional, default: `15`)
	pub fn from_lookup(lookup: Lookup) -> Result<Option<Self>, ConfigError> {
		let Some(host) = lookup("FUNNEL_SMTP_HOST") else {
			return Ok(None);
		};

		let port = match lookup("FUNNEL_SMTP_PORT") {
			Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
				key: "FUNNEL_SMTP_PORT".to_string(),
				message: format!("'{raw}' is not a valid port number"),
			})?,
			None => 587,
		};

		let from_address = lookup("FUNNEL_SMTP_FROM_ADDRESS")
			.ok_or_else(|| ConfigError::MissingEnvVar("FUNNEL_SMTP_FROM_ADDRESS".to_string()))?;

		let timeout_secs = match lookup("FUNNEL_SMTP_TIMEOUT_SECS") {
			Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
				key: "FUNNEL_SMTP_TIMEOUT_SECS".to_string(),
				message: format!("'{raw}' is not a valid number of seconds"),
			})?,
			None => 15,
		};

		Ok(Some(Self {
			host,
			port,
			username: lookup("FUNNEL_SMTP_USERNAME"),
			password: lookup("FUNNEL_SMTP_PASSWORD").map(SecretString::new),
			from_address,
			from_name: lookup("FUNNEL_SMTP_FROM_NAME").unwrap_or_else(|| "Funnel".to_string()),
			use_tls: lookup("FUNNEL_SMTP_USE_TLS")
				.map(|v| v.to_lowercase() != "false" && v != "0")
				.unwrap_or(true),
			timeout_secs,
		}))
	}
}

/// Checkout provider (Stripe-compatible) settings.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
	pub secret_key: Option<SecretString>,
	pub price_id: Option<String>,
	pub base_url: String,
}

impl CheckoutConfig {
	/// - `FUNNEL_CHECKOUT_SECRET_KEY`
	/// - `FUNNEL_CHECKOUT_PRICE_ID` (default price when the request names none)
	/// - `FUNNEL_CHECKOUT_BASE_URL` (optional, default: `https://api.stripe.com`)
	pub fn from_lookup(lookup: Lookup) -> Self {
		Self {
			secret_key: lookup("FUNNEL_CHECKOUT_SECRET_KEY").map(SecretString::new),
			price_id: lookup("FUNNEL_CHECKOUT_PRICE_ID"),
			base_url: lookup("FUNNEL_CHECKOUT_BASE_URL")
				.unwrap_or_else(|| "https://api.stripe.com".to_string()),
		}
	}
}

/// Public site settings used for provider redirect URLs and email copy.
#[derive(Debug, Clone)]
pub struct SiteConfig {
	pub base_url: String,
	/// Display name of the product being sold, used in tracking content
	/// fields and the confirmation email.
	pub product_name: String,
}

impl SiteConfig {
	/// - `FUNNEL_SITE_BASE_URL` (optional, default: `http://localhost:3000`)
	/// - `FUNNEL_SITE_PRODUCT_NAME` (optional, default: `Digital Bundle`)
	pub fn from_lookup(lookup: Lookup) -> Self {
		Self {
			base_url: lookup("FUNNEL_SITE_BASE_URL")
				.unwrap_or_else(|| "http://localhost:3000".to_string()),
			product_name: lookup("FUNNEL_SITE_PRODUCT_NAME")
				.unwrap_or_else(|| "Digital Bundle".to_string()),
		}
	}
}
