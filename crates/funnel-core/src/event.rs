// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The normalized marketing event model.
//!
//! A [`MarketingEvent`] is constructed once per logical user action and handed
//! to every platform adapter that fires for that action, carrying the shared
//! deduplication event id. Adapters translate it into their platform's wire
//! format; nothing in this module performs I/O.

use serde::{Deserialize, Serialize};

use crate::hash::generate_event_id;

/// Ad platforms Funnel dispatches conversion events to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
	Facebook,
	TikTok,
}

impl std::fmt::Display for Platform {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Platform::Facebook => write!(f, "Facebook"),
			Platform::TikTok => write!(f, "TikTok"),
		}
	}
}

impl std::str::FromStr for Platform {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Facebook" => Ok(Platform::Facebook),
			"TikTok" => Ok(Platform::TikTok),
			other => Err(format!("unknown platform '{other}', expected 'Facebook' or 'TikTok'")),
		}
	}
}

/// Normalized marketing event names.
///
/// Platform-specific spellings are applied by the adapters; in particular
/// TikTok requires `Purchase` to be sent as `CompletePayment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventName {
	ViewContent,
	InitiateCheckout,
	Purchase,
	Lead,
	Contact,
	CompletePayment,
}

impl EventName {
	/// The canonical spelling used for Facebook and for pixel descriptors.
	pub fn as_str(&self) -> &'static str {
		match self {
			EventName::ViewContent => "ViewContent",
			EventName::InitiateCheckout => "InitiateCheckout",
			EventName::Purchase => "Purchase",
			EventName::Lead => "Lead",
			EventName::Contact => "Contact",
			EventName::CompletePayment => "CompletePayment",
		}
	}

	/// Whether this event represents a confirmed monetary conversion.
	///
	/// Only these events may carry value/currency; attaching amounts to
	/// view or click signals corrupts platform optimization.
	pub fn is_monetary(&self) -> bool {
		matches!(self, EventName::Purchase | EventName::CompletePayment)
	}
}

impl std::fmt::Display for EventName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for EventName {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ViewContent" => Ok(EventName::ViewContent),
			"InitiateCheckout" => Ok(EventName::InitiateCheckout),
			"Purchase" => Ok(EventName::Purchase),
			"Lead" => Ok(EventName::Lead),
			"Contact" => Ok(EventName::Contact),
			"CompletePayment" => Ok(EventName::CompletePayment),
			other => Err(format!("unknown event name '{other}'")),
		}
	}
}

/// Customer contact fields attached to a conversion event.
///
/// Every field here is PII. Values are held raw in-process and one-way hashed
/// by the adapters before crossing the process boundary.
#[derive(Clone, Default, Deserialize)]
pub struct Identity {
	pub email: Option<String>,
	pub phone: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub country: Option<String>,
	pub city: Option<String>,
	pub state: Option<String>,
	pub postal_code: Option<String>,
}

impl Identity {
	pub fn has_email(&self) -> bool {
		self.email.as_deref().is_some_and(|e| !e.is_empty())
	}

	pub fn has_phone(&self) -> bool {
		self.phone.as_deref().is_some_and(|p| !p.is_empty())
	}

	pub fn is_empty(&self) -> bool {
		!self.has_email()
			&& !self.has_phone()
			&& self.first_name.is_none()
			&& self.last_name.is_none()
			&& self.country.is_none()
			&& self.city.is_none()
			&& self.state.is_none()
			&& self.postal_code.is_none()
	}
}

// Presence flags only; the raw contact fields must never reach logs.
impl std::fmt::Debug for Identity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Identity")
			.field("has_email", &self.has_email())
			.field("has_phone", &self.has_phone())
			.field("has_name", &(self.first_name.is_some() || self.last_name.is_some()))
			.field("has_address", &(self.country.is_some() || self.postal_code.is_some()))
			.finish()
	}
}

/// Request-context metadata used to improve platform match quality.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
	pub source_url: Option<String>,
	pub referrer: Option<String>,
	pub user_agent: Option<String>,
	pub client_ip: Option<String>,
	pub host: Option<String>,
}

impl RequestContext {
	/// Extract context from incoming request headers.
	///
	/// The client IP is taken from the first entry of `x-forwarded-for` when
	/// present, else `x-real-ip`, else the supplied fallback.
	pub fn from_headers(headers: &http::HeaderMap, fallback_ip: &str) -> Self {
		let client_ip = headers
			.get("x-forwarded-for")
			.and_then(|v| v.to_str().ok())
			.map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
			.or_else(|| {
				headers
					.get("x-real-ip")
					.and_then(|v| v.to_str().ok())
					.map(|s| s.trim().to_string())
			})
			.or_else(|| Some(fallback_ip.to_string()));

		let user_agent = headers
			.get("user-agent")
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);

		let referrer = headers
			.get("referer")
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);

		let host = headers
			.get("host")
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);

		Self {
			source_url: None,
			referrer,
			user_agent,
			client_ip,
			host,
		}
	}

	pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
		self.source_url = Some(url.into());
		self
	}
}

/// A normalized conversion event, constructed per user action.
///
/// Monetary fields only attach through [`MarketingEvent::purchase`] or the
/// guarded [`MarketingEvent::with_value`], so interest signals cannot carry
/// amounts by accident.
#[derive(Debug, Clone)]
pub struct MarketingEvent {
	pub name: EventName,
	pub event_id: String,
	pub identity: Identity,
	pub value: Option<f64>,
	pub currency: Option<String>,
	pub content_name: Option<String>,
	pub content_id: Option<String>,
	pub content_type: Option<String>,
	pub order_id: Option<String>,
	pub context: RequestContext,
}

impl MarketingEvent {
	/// A bare event with a caller-supplied dedup id.
	pub fn new(name: EventName, event_id: impl Into<String>) -> Self {
		Self {
			name,
			event_id: event_id.into(),
			identity: Identity::default(),
			value: None,
			currency: None,
			content_name: None,
			content_id: None,
			content_type: None,
			order_id: None,
			context: RequestContext::default(),
		}
	}

	/// An InitiateCheckout event. Carries no monetary value; checkout
	/// initiation is not a confirmed monetary event.
	pub fn initiate_checkout(event_id: impl Into<String>, context: RequestContext) -> Self {
		let mut event = Self::new(EventName::InitiateCheckout, event_id);
		event.context = context;
		event
	}

	/// A verified Purchase event carrying value, currency and the order id.
	pub fn purchase(
		event_id: impl Into<String>,
		identity: Identity,
		value: f64,
		currency: impl Into<String>,
		order_id: impl Into<String>,
		context: RequestContext,
	) -> Self {
		let mut event = Self::new(EventName::Purchase, event_id);
		event.identity = identity;
		event.value = Some(value);
		event.currency = Some(currency.into());
		event.order_id = Some(order_id.into());
		event.context = context;
		event
	}

	/// Same as [`MarketingEvent::new`] but generates a fresh event id.
	pub fn with_generated_id(name: EventName) -> Self {
		Self::new(name, generate_event_id())
	}

	pub fn with_identity(mut self, identity: Identity) -> Self {
		self.identity = identity;
		self
	}

	pub fn with_context(mut self, context: RequestContext) -> Self {
		self.context = context;
		self
	}

	pub fn with_content(
		mut self,
		name: Option<String>,
		id: Option<String>,
		content_type: Option<String>,
	) -> Self {
		self.content_name = name;
		self.content_id = id;
		self.content_type = content_type;
		self
	}

	/// Attach a monetary amount, ignored for non-monetary event types.
	pub fn with_value(mut self, value: f64, currency: impl Into<String>) -> Self {
		if self.name.is_monetary() {
			self.value = Some(value);
			self.currency = Some(currency.into());
		} else {
			tracing::debug!(event = %self.name, "dropping value on non-monetary event");
		}
		self
	}
}
