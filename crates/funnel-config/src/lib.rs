// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration for the Funnel backend.
//!
//! Configuration is resolved once at process start from `FUNNEL_*` environment
//! variables into an explicit [`AppConfig`] and injected by reference into
//! every component; nothing reads the environment at call sites.
//!
//! Platform credentials are optional at load time: a missing credential is a
//! per-call configuration error in the adapter that needs it, never a startup
//! failure, so a deployment can run with a single platform configured.
//!
//! # Usage
//!
//! ```no_run
//! let config = funnel_config::AppConfig::from_env()?;
//! println!("listening on {}", config.socket_addr());
//! # Ok::<(), funnel_config::ConfigError>(())
//! ```

pub mod error;
pub mod sections;

pub use error::ConfigError;
pub use sections::{
	CheckoutConfig, FacebookConfig, HttpConfig, MonitorConfig, SiteConfig, SmtpConfig,
	TiktokConfig,
};

use tracing::info;

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
	pub http: HttpConfig,
	pub facebook: FacebookConfig,
	pub tiktok: TiktokConfig,
	pub monitor: MonitorConfig,
	pub smtp: Option<SmtpConfig>,
	pub checkout: CheckoutConfig,
	pub site: SiteConfig,
}

impl AppConfig {
	/// Load configuration from `FUNNEL_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(&|key| std::env::var(key).ok())
	}

	/// Load configuration from an arbitrary key lookup.
	///
	/// `from_env` delegates here; tests pass closures instead of mutating
	/// process-wide environment state.
	pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let config = Self {
			http: HttpConfig::from_lookup(lookup)?,
			facebook: FacebookConfig::from_lookup(lookup),
			tiktok: TiktokConfig::from_lookup(lookup),
			monitor: MonitorConfig::from_lookup(lookup),
			smtp: SmtpConfig::from_lookup(lookup)?,
			checkout: CheckoutConfig::from_lookup(lookup),
			site: SiteConfig::from_lookup(lookup),
		};

		info!(
			host = %config.http.host,
			port = config.http.port,
			facebook_configured = config.facebook.is_configured(),
			tiktok_configured = config.tiktok.is_configured(),
			smtp_configured = config.smtp.is_some(),
			checkout_configured = config.checkout.secret_key.is_some(),
			"configuration loaded"
		);

		Ok(config)
	}

	/// Socket address string for binding the HTTP server.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}
