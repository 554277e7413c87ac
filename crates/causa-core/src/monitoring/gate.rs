//! Eligibility gate: once-per-24h polling throttle.
//!
//! Wall-clock hours, not calendar days, so a case checked at 23:00 is not
//! eligible again at 08:00 the next morning. Uniform global throttling
//! across time zones.

use chrono::{DateTime, Duration, Utc};

use crate::monitoring::TrackedCase;

/// Throttle policy, injected so the interval is not baked into the check.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    pub min_interval: Duration,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::hours(24),
        }
    }
}

/// Whether a poll against the external API is due for this case.
///
/// Pure: `now` is threaded in by the caller, never read from a clock, and
/// nothing is written here. The caller updates `last_checked_at` after
/// the poll attempt, success or failure alike.
pub fn is_due(case: &TrackedCase, now: DateTime<Utc>, policy: &GatePolicy) -> bool {
    match case.last_checked_at {
        None => true,
        Some(checked_at) => now - checked_at >= policy.min_interval,
    }
}
