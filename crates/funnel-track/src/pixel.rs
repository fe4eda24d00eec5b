// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-only signal descriptors.
//!
//! ViewContent and button clicks fire from the browser pixel only, preserving
//! the richer client-side interaction context; the server's job is limited to
//! generating the event id and classifying intent. These descriptors never
//! carry monetary fields.

use serde::Serialize;

use funnel_core::{generate_event_id, EventName};

/// A pixel event for the browser to fire.
#[derive(Debug, Clone, Serialize)]
pub struct PixelEvent {
	pub event_name: String,
	/// Shared dedup id, reused by any paired server-side call.
	pub event_id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_category: Option<String>,
}

/// Intent signal inferred from a clicked button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ButtonIntent {
	/// Ready-to-buy action; emitted as an InitiateCheckout-type signal.
	HighIntent,
	/// Browsing or exploring; emitted as a generic Lead signal.
	Interest,
}

/// Classify a button by its visible text.
///
/// A heuristic, not exact matching: text containing a purchase keyword marks
/// the click as high intent.
pub fn classify_button_intent(text: &str) -> ButtonIntent {
	let lowered = text.to_lowercase();
	if ["buy", "get", "checkout"].iter().any(|kw| lowered.contains(kw)) {
		ButtonIntent::HighIntent
	} else {
		ButtonIntent::Interest
	}
}

/// Descriptor for the primary page-view signal.
pub fn view_content(content_name: Option<String>, content_id: Option<String>) -> PixelEvent {
	PixelEvent {
		event_name: EventName::ViewContent.as_str().to_string(),
		event_id: generate_event_id(),
		content_name,
		content_id,
		content_category: None,
	}
}

/// Descriptor for a button-click signal.
///
/// High-intent clicks upgrade to an InitiateCheckout signal; everything else
/// is a Lead interest signal.
pub fn button_click(location: &str, text: &str) -> PixelEvent {
	let intent = classify_button_intent(text);
	let (event_name, category) = match intent {
		ButtonIntent::HighIntent => (EventName::InitiateCheckout, "Purchase Intent"),
		ButtonIntent::Interest => (EventName::Lead, "Interest Action"),
	};

	PixelEvent {
		event_name: event_name.as_str().to_string(),
		event_id: generate_event_id(),
		content_name: Some(if text.is_empty() {
			"Button Interaction".to_string()
		} else {
			text.to_string()
		}),
		content_id: None,
		content_category: Some(format!("{category} - {location}")),
	}
}

/// Whether the visit looks attributable to a Facebook ad.
///
/// Facebook-bound client events only fire for visits carrying Facebook UTM
/// parameters, an `fbclid`, or a facebook/instagram referrer. Localhost is
/// always allowed for testing.
pub fn facebook_attribution(query: &str, referrer: &str, host: &str) -> bool {
	let query = query.to_lowercase();
	let has_utm = query.contains("utm_source=facebook")
		|| query.contains("utm_medium=facebook")
		|| query.contains("utm_campaign=");
	let has_fbclid = query.contains("fbclid=");
	let has_referrer = ["facebook.com", "fb.com", "instagram.com"]
		.iter()
		.any(|domain| referrer.contains(domain));
	let is_localhost = host == "localhost" || host.starts_with("localhost:");

	has_utm || has_fbclid || has_referrer || is_localhost
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn purchase_keywords_are_high_intent() {
		assert_eq!(classify_button_intent("Buy Now"), ButtonIntent::HighIntent);
		assert_eq!(classify_button_intent("GET INSTANT ACCESS"), ButtonIntent::HighIntent);
		assert_eq!(classify_button_intent("Proceed to checkout"), ButtonIntent::HighIntent);
		assert_eq!(classify_button_intent("Watch preview"), ButtonIntent::Interest);
		assert_eq!(classify_button_intent(""), ButtonIntent::Interest);
	}

	#[test]
	fn high_intent_click_upgrades_to_initiate_checkout() {
		let event = button_click("hero", "Buy Now");
		assert_eq!(event.event_name, "InitiateCheckout");
		assert!(event.content_category.as_deref().unwrap().contains("hero"));

		let event = button_click("footer", "Read FAQ");
		assert_eq!(event.event_name, "Lead");
	}

	#[test]
	fn pixel_events_never_carry_value() {
		let event = view_content(Some("Bundle".to_string()), None);
		let json = serde_json::to_value(&event).unwrap();
		assert!(json.get("value").is_none());
		assert!(json.get("currency").is_none());
		assert_eq!(json.get("event_name").unwrap(), "ViewContent");
		assert_eq!(json.get("event_id").unwrap().as_str().unwrap().len(), 32);
	}

	#[test]
	fn attribution_recognizes_utm_fbclid_referrer_and_localhost() {
		assert!(facebook_attribution("utm_source=facebook", "", "shop.example.com"));
		assert!(facebook_attribution("fbclid=abc123", "", "shop.example.com"));
		assert!(facebook_attribution("", "https://m.facebook.com/", "shop.example.com"));
		assert!(facebook_attribution("", "https://instagram.com/p/x", "shop.example.com"));
		assert!(facebook_attribution("", "", "localhost:3000"));
		assert!(!facebook_attribution("utm_source=newsletter", "https://example.com", "shop.example.com"));
	}
}
