// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checkout orchestration against a Stripe-compatible payment provider.
//!
//! Wraps session creation and post-payment verification, with conversion
//! tracking and confirmation email as best-effort side effects that never
//! block the purchase flow.

pub mod order;
mod provider;
mod service;

pub use provider::{
	CheckoutError, CustomerAddress, CustomerDetails, ProviderClient, SessionDetails,
};
pub use service::{BeginOutcome, CheckoutService, ConfirmOutcome, EmailStatus};
