// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversion tracking HTTP server.
//!
//! Exposes the tracking, checkout and monitoring operations over a small JSON
//! API for the storefront frontend:
//!
//! - `POST /api/checkout` and `POST /api/checkout/confirm` for the purchase flow
//! - `POST /api/facebook-conversion` and `POST /api/tiktok-conversion` for
//!   server-side events paired with browser pixels
//! - `POST /api/track/view-content` and `POST /api/track/button-click` for
//!   client-only pixel descriptors
//! - `GET /api/monitor-events` for the bearer-gated operational dashboard
//! - `GET /health`

pub mod api;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
