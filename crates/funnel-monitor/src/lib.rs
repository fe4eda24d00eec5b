// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory conversion event monitor.
//!
//! [`EventMonitor`] is a bounded, mutex-guarded ring buffer holding the most
//! recent conversion attempts, newest first. It exists for operational
//! visibility only: entries are never updated after creation, there is no
//! durability, and falling off the end of the buffer (or a process restart)
//! is the only way an entry dies.
//!
//! Adapters record an entry on every send attempt, success or failure. Raw
//! PII never enters the monitor; entries carry boolean presence flags and a
//! truncated user agent instead.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use funnel_core::Platform;

/// Default ring buffer capacity.
pub const DEFAULT_CAPACITY: usize = 50;

/// User agents are truncated to this many characters before being stored.
const USER_AGENT_MAX: usize = 50;

/// A conversion attempt to record, as reported by a platform adapter.
#[derive(Debug, Clone)]
pub struct MonitorEntry {
	pub platform: Platform,
	pub event_name: String,
	pub event_id: String,
	pub success: bool,
	pub host: String,
	pub user_agent: String,
	pub has_email: bool,
	pub has_phone: bool,
	pub value: Option<String>,
	pub currency: Option<String>,
	pub error: Option<String>,
}

/// A recorded conversion attempt. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct LoggedEvent {
	/// Assigned at record time.
	pub timestamp: DateTime<Utc>,
	pub platform: Platform,
	pub event_name: String,
	pub event_id: String,
	pub success: bool,
	pub host: String,
	pub user_agent: String,
	pub has_email: bool,
	pub has_phone: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Summary statistics over the whole buffer (unfiltered).
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStats {
	pub total: usize,
	pub facebook: usize,
	pub tiktok: usize,
	pub successful: usize,
	pub failed: usize,
	/// Entries recorded within the trailing hour, measured at query time.
	pub last_hour: usize,
}

/// Result of a monitor query.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
	pub stats: MonitorStats,
	pub events: Vec<LoggedEvent>,
	pub timestamp: DateTime<Utc>,
}

/// Bounded most-recent-first log of conversion attempts.
///
/// Constructed explicitly and shared behind an `Arc`; tests build isolated
/// instances instead of reaching for process-global state. The mutex keeps
/// concurrent inserts from corrupting ordering or exceeding capacity under a
/// multi-threaded runtime.
#[derive(Debug)]
pub struct EventMonitor {
	capacity: usize,
	events: Mutex<VecDeque<LoggedEvent>>,
}

impl Default for EventMonitor {
	fn default() -> Self {
		Self::new()
	}
}

impl EventMonitor {
	/// A monitor with the standard capacity of [`DEFAULT_CAPACITY`] entries.
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_CAPACITY)
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			capacity,
			events: Mutex::new(VecDeque::with_capacity(capacity)),
		}
	}

	/// Record a conversion attempt, evicting the oldest entry at capacity.
	pub fn record(&self, entry: MonitorEntry) {
		let logged = LoggedEvent {
			timestamp: Utc::now(),
			platform: entry.platform,
			event_name: entry.event_name,
			event_id: entry.event_id,
			success: entry.success,
			host: entry.host,
			user_agent: truncate_user_agent(&entry.user_agent),
			has_email: entry.has_email,
			has_phone: entry.has_phone,
			value: entry.value,
			currency: entry.currency,
			error: entry.error,
		};

		let mut events = self.events.lock().expect("monitor mutex poisoned");
		events.push_front(logged);
		while events.len() > self.capacity {
			events.pop_back();
		}
	}

	/// Query recent events, optionally filtered by platform, newest first.
	///
	/// Stats always cover the whole buffer; the filter and limit shape only
	/// the returned event slice.
	pub fn query(&self, platform: Option<Platform>, limit: usize) -> MonitorReport {
		let now = Utc::now();
		let one_hour_ago = now - Duration::hours(1);
		let events = self.events.lock().expect("monitor mutex poisoned");

		let stats = MonitorStats {
			total: events.len(),
			facebook: events.iter().filter(|e| e.platform == Platform::Facebook).count(),
			tiktok: events.iter().filter(|e| e.platform == Platform::TikTok).count(),
			successful: events.iter().filter(|e| e.success).count(),
			failed: events.iter().filter(|e| !e.success).count(),
			last_hour: events.iter().filter(|e| e.timestamp > one_hour_ago).count(),
		};

		let filtered: Vec<LoggedEvent> = events
			.iter()
			.filter(|e| platform.map_or(true, |p| e.platform == p))
			.take(limit)
			.cloned()
			.collect();

		MonitorReport {
			stats,
			events: filtered,
			timestamp: now,
		}
	}

	/// Number of entries currently held.
	pub fn len(&self) -> usize {
		self.events.lock().expect("monitor mutex poisoned").len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

fn truncate_user_agent(user_agent: &str) -> String {
	if user_agent.chars().count() <= USER_AGENT_MAX {
		return user_agent.to_string();
	}
	let truncated: String = user_agent.chars().take(USER_AGENT_MAX).collect();
	format!("{truncated}...")
}
