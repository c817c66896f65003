//! Identifier-keyed rate limiting and abuse control.
//!
//! Guards the scan entry points with three nested fixed windows (minute,
//! hour, day) per plan tier, optional per-endpoint minute overrides for
//! expensive operations, and escalating violation blocks for clients that
//! keep hammering a closed window. State lives behind the
//! [`RateLimitStore`] trait; the in-process [`MemoryStore`] is correct for
//! a single instance, and a shared external store is the drop-in extension
//! point for multi-instance deployments.

mod limiter;
mod store;

pub use limiter::{Decision, PlanTier, RateLimiter, TierLimits};
pub use store::{MemoryStore, RateLimitRecord, RateLimitStore, Window};
