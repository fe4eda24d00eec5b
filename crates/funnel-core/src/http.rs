// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client builder with consistent User-Agent and timeout.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Default timeout for outbound platform calls.
///
/// Tracking is fire-and-forget from the user's perspective, but an unbounded
/// platform outage would otherwise leave calls pending indefinitely.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates a new HTTP client with the standard Funnel User-Agent header and
/// the default outbound timeout.
pub fn new_client() -> Client {
	builder().build().expect("failed to build HTTP client")
}

/// Creates a new HTTP client builder with the standard Funnel User-Agent
/// header and the default timeout applied.
///
/// Use this when a caller needs to customize the client further.
pub fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.timeout(DEFAULT_TIMEOUT)
}

/// Returns the standard Funnel User-Agent string.
///
/// Format: `funnel/{version}`
pub fn user_agent() -> String {
	format!("funnel/{}", env!("CARGO_PKG_VERSION"))
}
