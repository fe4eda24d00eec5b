// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Facebook Conversions API adapter.
//!
//! Translates a normalized [`funnel_core::MarketingEvent`] into the
//! Conversions API wire format (hashed `user_data`, `custom_data`, a single
//! element in a `data` array), posts it to the events endpoint for the
//! configured pixel, and records the outcome in the event monitor.
//!
//! The adapter never panics and never lets an upstream failure escape as
//! anything other than a structured [`FacebookError`]; checkout flow must not
//! be disturbed by tracking trouble.

mod client;
mod payload;

pub use client::{FacebookClient, FacebookError, FacebookResponse};
pub use payload::{FacebookCustomData, FacebookEvent, FacebookPayload, FacebookUserData};
