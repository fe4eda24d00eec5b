// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Funnel conversion-tracking backend.
//!
//! This crate holds everything the platform adapters and the tracking façade
//! share: the normalized [`MarketingEvent`] model, PII hashing and event-id
//! generation, request-context extraction, the [`SecretString`] wrapper for
//! credentials, and the standard HTTP client builder.
//!
//! PII leaves the process only as SHA-256 digests (see [`hash_pii`]); the
//! single exception is the user agent and client IP, which the ad platforms
//! expect in the clear for match-quality purposes.

pub mod event;
pub mod hash;
pub mod http;
pub mod secret;

pub use event::{EventName, Identity, MarketingEvent, Platform, RequestContext};
pub use hash::{generate_event_id, hash_pii, normalize_phone};
pub use secret::SecretString;
