// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper for credentials.
//!
//! Access tokens, the checkout provider's secret key, the SMTP password, and
//! the monitor shared secret are all held as [`SecretString`] so they cannot
//! leak through `Debug`/`Display` formatting or tracing output.

use zeroize::Zeroize;

/// An owned string whose contents are redacted from all formatting and
/// zeroized from memory on drop.
///
/// Use [`SecretString::expose`] at the single point where the raw value is
/// actually needed (an HTTP header, an SMTP credential).
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
	/// Wrap a raw secret value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Access the raw secret value.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consume the wrapper and return the raw value.
	///
	/// The caller takes over responsibility for the value's lifetime.
	pub fn into_inner(mut self) -> String {
		std::mem::take(&mut self.0)
	}

	/// Whether the wrapped value is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Drop for SecretString {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

impl std::fmt::Debug for SecretString {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("SecretString([REDACTED])")
	}
}

impl std::fmt::Display for SecretString {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("[REDACTED]")
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
