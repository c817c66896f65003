//! Rate-limit state and its storage seam.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::limiter::Decision;

/// One fixed counting window.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub count: u32,
    pub started_at: Instant,
}

impl Window {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            count: 0,
            started_at: now,
        }
    }

    /// Count one request, resetting first when the window has elapsed.
    /// Returns the count including this request.
    pub fn hit(&mut self, now: Instant, size: Duration) -> u32 {
        if now.duration_since(self.started_at) >= size {
            self.started_at = now;
            self.count = 0;
        }
        self.count += 1;
        self.count
    }

    /// Whole seconds until the window rolls over, at least 1.
    #[must_use]
    pub fn remaining_secs(&self, now: Instant, size: Duration) -> u64 {
        size.saturating_sub(now.duration_since(self.started_at))
            .as_secs()
            .max(1)
    }
}

/// Abuse-control state for one identifier.
#[derive(Debug, Clone)]
pub struct RateLimitRecord {
    pub minute: Window,
    pub hour: Window,
    pub day: Window,
    /// Per-endpoint minute windows, created lazily for overridden endpoints.
    pub endpoint_minutes: HashMap<String, Window>,
    pub violations: u32,
    pub blocked_until: Option<Instant>,
    pub last_seen: Instant,
}

impl RateLimitRecord {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            minute: Window::new(now),
            hour: Window::new(now),
            day: Window::new(now),
            endpoint_minutes: HashMap::new(),
            violations: 0,
            blocked_until: None,
            last_seen: now,
        }
    }
}

/// Storage seam for rate-limit state.
///
/// `with_record` must serialize the whole read-modify-write: requests from
/// the same identifier arrive concurrently, and a torn
/// check-then-increment would under-count.
pub trait RateLimitStore: Send + Sync {
    /// Run `apply` against the identifier's record (created on first use)
    /// under the store's lock, returning its decision.
    fn with_record(
        &self,
        identifier: &str,
        now: Instant,
        apply: &mut dyn FnMut(&mut RateLimitRecord) -> Decision,
    ) -> Decision;

    /// Drop records idle longer than `max_idle`. Returns how many were
    /// evicted.
    fn evict_idle(&self, now: Instant, max_idle: Duration) -> usize;
}

/// In-process store: a mutex-guarded identifier map. Correct for a single
/// instance; multi-instance deployments need a shared store behind the
/// same trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryStore {
    fn with_record(
        &self,
        identifier: &str,
        now: Instant,
        apply: &mut dyn FnMut(&mut RateLimitRecord) -> Decision,
    ) -> Decision {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let record = records
            .entry(identifier.to_string())
            .or_insert_with(|| RateLimitRecord::new(now));
        record.last_seen = now;
        apply(record)
    }

    fn evict_idle(&self, now: Instant, max_idle: Duration) -> usize {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|_, record| now.duration_since(record.last_seen) < max_idle);
        before - records.len()
    }
}
