// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Order display helpers.

/// Short human-facing order reference derived from the provider session id:
/// the last 8 characters, uppercased.
pub fn order_code(session_id: &str) -> String {
	let chars: Vec<char> = session_id.chars().collect();
	let start = chars.len().saturating_sub(8);
	chars[start..].iter().collect::<String>().to_uppercase()
}

/// Split a full name into first and last parts.
///
/// Everything after the first whitespace run is the last name; a single-word
/// name has no last name.
pub fn split_name(name: Option<&str>) -> (Option<String>, Option<String>) {
	let name = match name.map(str::trim) {
		Some(n) if !n.is_empty() => n,
		_ => return (None, None),
	};

	match name.split_once(char::is_whitespace) {
		Some((first, rest)) => (
			Some(first.to_string()),
			Some(rest.trim_start().to_string()),
		),
		None => (Some(name.to_string()), None),
	}
}

/// Render minor-unit cents as a display price, e.g. 1499 -> "$14.99".
pub fn format_price(cents: i64) -> String {
	let sign = if cents < 0 { "-" } else { "" };
	let cents = cents.abs();
	format!("{sign}${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn order_code_is_last_eight_uppercased() {
		assert_eq!(order_code("cs_test_a1b2c3d4e5f6"), "C3D4E5F6");
		assert_eq!(order_code("abc"), "ABC");
		assert_eq!(order_code(""), "");
	}

	#[test]
	fn names_split_on_first_space() {
		assert_eq!(
			split_name(Some("Ada Lovelace")),
			(Some("Ada".to_string()), Some("Lovelace".to_string()))
		);
		assert_eq!(
			split_name(Some("Ada King Lovelace")),
			(Some("Ada".to_string()), Some("King Lovelace".to_string()))
		);
		assert_eq!(split_name(Some("Ada")), (Some("Ada".to_string()), None));
		assert_eq!(split_name(Some("   ")), (None, None));
		assert_eq!(split_name(None), (None, None));
	}

	#[test]
	fn prices_render_with_two_decimals() {
		assert_eq!(format_price(1499), "$14.99");
		assert_eq!(format_price(2900), "$29.00");
		assert_eq!(format_price(5), "$0.05");
		assert_eq!(format_price(-250), "-$2.50");
	}
}
