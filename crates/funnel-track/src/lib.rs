// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracking façade.
//!
//! The public API application code calls, one operation per marketing moment:
//!
//! - [`Tracker::initiate_checkout`] and [`Tracker::purchase`] dispatch to both
//!   platform adapters concurrently under a single shared deduplication event
//!   id and summarize the per-platform outcomes; they never return an error
//!   and never panic, because tracking is best-effort and must not disturb
//!   the checkout flow.
//! - [`pixel::view_content`] and [`pixel::button_click`] describe client-only
//!   signals: they produce a descriptor the browser pixel fires, and the
//!   server makes no Conversions/Events API call for them.
//! - [`CheckoutGuard`] is the once-per-checkout check-and-set that keeps a
//!   double click from producing duplicate InitiateCheckout events.

mod guard;
pub mod pixel;
mod tracker;

pub use guard::CheckoutGuard;
pub use pixel::{classify_button_intent, facebook_attribution, ButtonIntent, PixelEvent};
pub use tracker::{DispatchStatus, TrackSummary, Tracker};
