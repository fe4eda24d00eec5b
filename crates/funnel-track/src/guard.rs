// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Once-per-checkout tracking guard.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

const MAX_TRACKED_KEYS: usize = 1024;

#[derive(Debug, Default)]
struct GuardState {
	keys: HashSet<String>,
	order: VecDeque<String>,
}

/// Check-and-set guard ensuring InitiateCheckout fires at most once per
/// checkout attempt.
///
/// The check and the set are one step under the mutex, so two near-simultaneous
/// clicks cannot both pass; a boolean flag read-then-write would leave that
/// race open under a multi-threaded runtime. The key set is bounded: past
/// capacity the oldest keys are evicted, since keys arrive from clients and an
/// unbounded set would grow for the life of the process. A second click while
/// tracking is in flight (or after it completed) skips re-tracking and
/// proceeds straight to redirect.
#[derive(Debug)]
pub struct CheckoutGuard {
	state: Mutex<GuardState>,
	capacity: usize,
}

impl Default for CheckoutGuard {
	fn default() -> Self {
		Self::with_capacity(MAX_TRACKED_KEYS)
	}
}

impl CheckoutGuard {
	pub fn new() -> Self {
		Self::default()
	}

	fn with_capacity(capacity: usize) -> Self {
		Self {
			state: Mutex::new(GuardState::default()),
			capacity: capacity.max(1),
		}
	}

	/// Returns `true` exactly once per live key; callers fire tracking only on
	/// `true`.
	pub fn begin(&self, key: &str) -> bool {
		let mut state = self.state.lock().expect("checkout guard mutex poisoned");
		if !state.keys.insert(key.to_string()) {
			return false;
		}
		state.order.push_back(key.to_string());
		while state.order.len() > self.capacity {
			if let Some(oldest) = state.order.pop_front() {
				state.keys.remove(&oldest);
			}
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	#[test]
	fn begin_passes_exactly_once_per_key() {
		let guard = CheckoutGuard::new();
		assert!(guard.begin("visitor-1"));
		assert!(!guard.begin("visitor-1"));
		assert!(guard.begin("visitor-2"));
		assert!(!guard.begin("visitor-2"));
	}

	#[test]
	fn oldest_keys_are_evicted_past_capacity() {
		let guard = CheckoutGuard::with_capacity(2);
		assert!(guard.begin("visitor-a"));
		assert!(guard.begin("visitor-b"));
		assert!(guard.begin("visitor-c"));

		// Still tracked within capacity.
		assert!(!guard.begin("visitor-c"));
		// The oldest key fell out and may track again.
		assert!(guard.begin("visitor-a"));
	}

	#[test]
	fn eviction_keeps_the_set_and_order_in_step() {
		let guard = CheckoutGuard::with_capacity(3);
		for i in 0..100 {
			assert!(guard.begin(&format!("visitor-{i}")));
		}
		let state = guard.state.lock().unwrap();
		assert_eq!(state.keys.len(), 3);
		assert_eq!(state.order.len(), 3);
	}

	#[test]
	fn concurrent_begins_admit_a_single_winner() {
		let guard = Arc::new(CheckoutGuard::new());
		let handles: Vec<_> = (0..16)
			.map(|_| {
				let guard = Arc::clone(&guard);
				std::thread::spawn(move || guard.begin("visitor-1"))
			})
			.collect();

		let winners = handles
			.into_iter()
			.map(|h| h.join().unwrap())
			.filter(|won| *won)
			.count();
		assert_eq!(winners, 1);
	}
}
