// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP route handlers.

pub mod checkout;
pub mod conversions;
pub mod health;
pub mod monitor;
pub mod pixel;
