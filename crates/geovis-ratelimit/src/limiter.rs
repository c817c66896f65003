//! The limiter's decision logic.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::store::{RateLimitStore, Window};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(60 * 60 * 24);

/// Records idle longer than this are dropped by [`RateLimiter::sweep`].
const IDLE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// The limiter's verdict for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Hint for the client when rejected; `None` when allowed.
    pub retry_after_secs: Option<u64>,
}

impl Decision {
    #[must_use]
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            retry_after_secs: None,
        }
    }

    #[must_use]
    pub fn rejected(retry_after_secs: u64) -> Self {
        Self {
            allowed: false,
            retry_after_secs: Some(retry_after_secs),
        }
    }
}

/// Who the identifier is, threshold-wise. Anonymous clients are keyed by
/// IP; authenticated clients by organization, with the tier taken from
/// their plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTier {
    Anonymous,
    Starter,
    Growth,
    Scale,
}

/// Request ceilings for one plan tier.
#[derive(Debug, Clone, Copy)]
pub struct TierLimits {
    pub per_minute: u32,
    pub per_hour: u32,
    pub per_day: u32,
}

impl PlanTier {
    #[must_use]
    pub fn limits(self) -> TierLimits {
        match self {
            PlanTier::Anonymous => TierLimits {
                per_minute: 10,
                per_hour: 100,
                per_day: 300,
            },
            PlanTier::Starter => TierLimits {
                per_minute: 30,
                per_hour: 500,
                per_day: 2_000,
            },
            PlanTier::Growth => TierLimits {
                per_minute: 60,
                per_hour: 1_500,
                per_day: 6_000,
            },
            PlanTier::Scale => TierLimits {
                per_minute: 120,
                per_hour: 5_000,
                per_day: 20_000,
            },
        }
    }
}

/// Violation escalation: repeated minute-window abuse earns increasingly
/// long full blocks, independent of the normal windows.
fn violation_block(violations: u32) -> Option<Duration> {
    match violations {
        v if v >= 10 => Some(Duration::from_secs(3_600)),
        v if v >= 5 => Some(Duration::from_secs(600)),
        v if v >= 3 => Some(Duration::from_secs(60)),
        _ => None,
    }
}

fn secs_until(now: Instant, until: Instant) -> u64 {
    let remaining = until.duration_since(now);
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

/// Identifier-keyed limiter over a pluggable store.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    /// Per-minute ceilings for expensive endpoints, layered on top of the
    /// tier windows.
    endpoint_overrides: HashMap<String, u32>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self {
            store,
            endpoint_overrides: HashMap::new(),
        }
    }

    /// Add a per-minute ceiling for one endpoint.
    #[must_use]
    pub fn with_endpoint_override(mut self, endpoint: &str, per_minute: u32) -> Self {
        self.endpoint_overrides
            .insert(endpoint.to_string(), per_minute);
        self
    }

    /// Decide whether this request may proceed, counting it if so.
    ///
    /// Check order: an active block short-circuits everything; then the
    /// endpoint override; then the minute, hour, and day windows. Minute
    /// and endpoint rejections record a violation.
    #[must_use]
    pub fn check(&self, identifier: &str, tier: PlanTier, endpoint: &str) -> Decision {
        self.check_at(identifier, tier, endpoint, Instant::now())
    }

    fn check_at(
        &self,
        identifier: &str,
        tier: PlanTier,
        endpoint: &str,
        now: Instant,
    ) -> Decision {
        let limits = tier.limits();
        let endpoint_limit = self.endpoint_overrides.get(endpoint).copied();

        let decision = self.store.with_record(identifier, now, &mut |record| {
            if let Some(until) = record.blocked_until {
                if until > now {
                    return Decision::rejected(secs_until(now, until));
                }
                record.blocked_until = None;
            }

            if let Some(limit) = endpoint_limit {
                let window = record
                    .endpoint_minutes
                    .entry(endpoint.to_string())
                    .or_insert_with(|| Window::new(now));
                if window.hit(now, MINUTE) > limit {
                    let retry = window.remaining_secs(now, MINUTE);
                    record.violations += 1;
                    if let Some(block) = violation_block(record.violations) {
                        record.blocked_until = Some(now + block);
                        return Decision::rejected(block.as_secs());
                    }
                    return Decision::rejected(retry);
                }
            }

            if record.minute.hit(now, MINUTE) > limits.per_minute {
                let retry = record.minute.remaining_secs(now, MINUTE);
                record.violations += 1;
                if let Some(block) = violation_block(record.violations) {
                    record.blocked_until = Some(now + block);
                    return Decision::rejected(block.as_secs());
                }
                return Decision::rejected(retry);
            }

            if record.hour.hit(now, HOUR) > limits.per_hour {
                return Decision::rejected(record.hour.remaining_secs(now, HOUR));
            }

            if record.day.hit(now, DAY) > limits.per_day {
                return Decision::rejected(record.day.remaining_secs(now, DAY));
            }

            Decision::allowed()
        });

        if !decision.allowed {
            tracing::warn!(
                identifier,
                endpoint,
                retry_after_secs = decision.retry_after_secs,
                "request rate limited"
            );
        }
        decision
    }

    /// Evict records idle for over 24 hours. Run periodically to bound
    /// memory.
    pub fn sweep(&self) -> usize {
        let evicted = self.store.evict_idle(Instant::now(), IDLE_TTL);
        if evicted > 0 {
            tracing::debug!(evicted, "swept idle rate-limit records");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn limiter() -> RateLimiter {
        RateLimiter::new(Arc::new(MemoryStore::new()))
    }

    fn drain(
        limiter: &RateLimiter,
        identifier: &str,
        tier: PlanTier,
        now: Instant,
        n: u32,
    ) {
        for _ in 0..n {
            let decision = limiter.check_at(identifier, tier, "scan", now);
            assert!(decision.allowed, "priming requests must pass");
        }
    }

    #[test]
    fn eleventh_request_in_a_minute_is_rejected_with_bounded_retry() {
        let limiter = limiter();
        let now = Instant::now();
        drain(&limiter, "1.2.3.4", PlanTier::Anonymous, now, 10);

        let decision = limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now);
        assert!(!decision.allowed);
        let retry = decision.retry_after_secs.expect("retry hint");
        assert!(retry <= 60, "got {retry}");
    }

    #[test]
    fn minute_window_resets_after_sixty_seconds() {
        let limiter = limiter();
        let now = Instant::now();
        drain(&limiter, "1.2.3.4", PlanTier::Anonymous, now, 10);
        assert!(!limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now).allowed);

        // One violation only; no block yet, and the fresh window admits.
        let later = now + Duration::from_secs(61);
        assert!(limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", later).allowed);
    }

    #[test]
    fn third_violation_blocks_for_at_least_sixty_seconds() {
        let limiter = limiter();
        let now = Instant::now();
        drain(&limiter, "1.2.3.4", PlanTier::Anonymous, now, 10);

        for _ in 0..2 {
            assert!(!limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now).allowed);
        }
        let third = limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now);
        assert!(!third.allowed);
        assert!(
            third.retry_after_secs.expect("retry hint") >= 60,
            "third violation must carry the full block duration"
        );
    }

    #[test]
    fn active_block_short_circuits_a_fresh_window() {
        let limiter = limiter();
        let start = Instant::now();

        // Build up five violations across separate minute windows (an
        // active block absorbs requests without counting new violations);
        // the fifth escalates to a 600s block.
        let mut at = start;
        for _ in 0..5 {
            drain(&limiter, "1.2.3.4", PlanTier::Anonymous, at, 10);
            assert!(!limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", at).allowed);
            at += Duration::from_secs(61);
        }
        let blocked_from = at - Duration::from_secs(61);

        // Two minutes into the block the minute counter would admit, but
        // the block must still reject without touching window state.
        let later = blocked_from + Duration::from_secs(120);
        let decision = limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", later);
        assert!(!decision.allowed);
        let retry = decision.retry_after_secs.expect("retry hint");
        assert!(retry > 60 && retry <= 600, "got {retry}");
    }

    #[test]
    fn block_expires_and_requests_flow_again() {
        let limiter = limiter();
        let now = Instant::now();
        drain(&limiter, "1.2.3.4", PlanTier::Anonymous, now, 10);
        for _ in 0..3 {
            assert!(!limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now).allowed);
        }

        let later = now + Duration::from_secs(61);
        assert!(limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", later).allowed);
    }

    #[test]
    fn hour_window_rejects_without_recording_violations() {
        let limiter = limiter();
        let start = Instant::now();

        // 100 allowed requests spread over ten minute-windows exhaust the
        // anonymous hour budget.
        for batch in 0..10 {
            let at = start + Duration::from_secs(61 * batch);
            drain(&limiter, "1.2.3.4", PlanTier::Anonymous, at, 10);
        }

        let at = start + Duration::from_secs(61 * 10);
        let decision = limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", at);
        assert!(!decision.allowed);
        assert!(decision.retry_after_secs.expect("retry hint") <= 60 * 60);

        // No minute violation was recorded, so no block: the next minute
        // window still rejects on the hour tier, not a block.
        let next = at + Duration::from_secs(61);
        let decision = limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", next);
        assert!(!decision.allowed);
    }

    #[test]
    fn endpoint_override_tightens_one_endpoint_only() {
        let limiter = limiter().with_endpoint_override("scan", 2);
        let now = Instant::now();

        assert!(limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now).allowed);
        assert!(limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now).allowed);
        assert!(!limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now).allowed);

        // Other endpoints still run on the plain tier windows.
        assert!(limiter.check_at("1.2.3.4", PlanTier::Anonymous, "health", now).allowed);
    }

    #[test]
    fn identifiers_are_independent() {
        let limiter = limiter();
        let now = Instant::now();
        drain(&limiter, "1.2.3.4", PlanTier::Anonymous, now, 10);
        assert!(!limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now).allowed);
        assert!(limiter.check_at("5.6.7.8", PlanTier::Anonymous, "scan", now).allowed);
    }

    #[test]
    fn paid_tiers_admit_more_per_minute() {
        let limiter = limiter();
        let now = Instant::now();
        drain(&limiter, "org:42", PlanTier::Growth, now, 60);
        assert!(!limiter.check_at("org:42", PlanTier::Growth, "scan", now).allowed);
    }

    #[test]
    fn sweep_evicts_only_idle_records() {
        let limiter = limiter();
        let now = Instant::now();
        assert!(limiter.check_at("1.2.3.4", PlanTier::Anonymous, "scan", now).allowed);
        assert_eq!(limiter.sweep(), 0, "recent record must survive the sweep");
    }
}
