// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! PII hashing and event-id generation.
//!
//! Both ad platforms require customer identifiers to be SHA-256 hashed over
//! the lowercased, trimmed value. [`hash_pii`] is the single implementation
//! used everywhere so the digest is byte-identical regardless of call site.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Hash a PII value for transmission to an ad platform.
///
/// The input is trimmed and lowercased before hashing, so values that differ
/// only in case or surrounding whitespace produce the same digest. Returns a
/// 64-character lowercase hex string.
pub fn hash_pii(value: &str) -> String {
	let normalized = value.trim().to_lowercase();
	let mut hasher = Sha256::new();
	hasher.update(normalized.as_bytes());
	hex::encode(hasher.finalize())
}

/// Strip a phone number down to its digits.
///
/// Facebook expects the `ph` field hashed over digits only, so formatting
/// characters must be removed before [`hash_pii`].
pub fn normalize_phone(phone: &str) -> String {
	phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Generate a deduplication event id.
///
/// One id is generated per logical user action and shared across every
/// platform call (pixel and server-side) for that action, so the platforms
/// can collapse duplicates. Uniqueness only needs to hold within a single
/// session's event stream; a collision degrades dedup, nothing more.
pub fn generate_event_id() -> String {
	let mut bytes = [0u8; 16];
	rand::thread_rng().fill_bytes(&mut bytes);
	hex::encode(bytes)
}


#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn prop_hash_is_64_lowercase_hex(input in ".*") {
			let digest = hash_pii(&input);
			prop_assert_eq!(digest.len(), 64);
			prop_assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
		}

		#[test]
		fn prop_hash_ignores_case_and_padding(input in "[a-zA-Z0-9@.]{1,40}") {
			let padded = format!("  {}  ", input.to_uppercase());
			prop_assert_eq!(hash_pii(&input), hash_pii(&padded));
		}

		#[test]
		fn prop_normalized_phone_is_digits(input in ".*") {
			prop_assert!(normalize_phone(&input).chars().all(|c| c.is_ascii_digit()));
		}
	}
}
