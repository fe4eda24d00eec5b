// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! TikTok Events API adapter.
//!
//! Translates a normalized [`funnel_core::MarketingEvent`] into the Events
//! API v1.3 wire format and posts it with the `Access-Token` header. TikTok's
//! naming compliance requires `Purchase` to go out as `CompletePayment`; the
//! rename happens here at send time and must be preserved or the platform
//! rejects or penalizes the event.
//!
//! Outcomes are recorded in the event monitor on every attempt.

mod client;
mod payload;

pub use client::{TiktokClient, TiktokError, TiktokResponse};
pub use payload::{wire_event_name, TiktokEvent, TiktokPage, TiktokPayload, TiktokProperties, TiktokUser};
