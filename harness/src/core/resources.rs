//! Resource samples and the deltas reported per test case.

use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of process counters.
///
/// Only differences between two samples are meaningful for the tick counters.
/// `peak_memory_kb` is a process-lifetime high-water mark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResourceSample {
    pub user_ticks: i64,
    pub system_ticks: i64,
    pub peak_memory_kb: i64,
}

/// How to report a tick delta that came out negative.
///
/// A negative delta only happens when one of the two samples degraded to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickPolicy {
    /// Report the raw difference.
    #[default]
    Propagate,
    /// Report negative differences as zero.
    Clamp,
}

/// Usage attributed to a single test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceDelta {
    pub utime: i64,
    pub stime: i64,
    /// Absolute peak RSS from the "after" sample.
    pub max_memory: i64,
}

impl ResourceDelta {
    pub fn between(before: ResourceSample, after: ResourceSample, policy: TickPolicy) -> Self {
        let apply = |delta: i64| match policy {
            TickPolicy::Propagate => delta,
            TickPolicy::Clamp => delta.max(0),
        };
        Self {
            utime: apply(after.user_ticks.saturating_sub(before.user_ticks)),
            stime: apply(after.system_ticks.saturating_sub(before.system_ticks)),
            max_memory: after.peak_memory_kb,
        }
    }

    pub fn has_negative_ticks(&self) -> bool {
        self.utime < 0 || self.stime < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(user: i64, system: i64, peak: i64) -> ResourceSample {
        ResourceSample {
            user_ticks: user,
            system_ticks: system,
            peak_memory_kb: peak,
        }
    }

    #[test]
    fn delta_subtracts_ticks_and_keeps_after_peak() {
        let delta = ResourceDelta::between(
            sample(10, 4, 900),
            sample(15, 6, 1200),
            TickPolicy::Propagate,
        );
        assert_eq!(
            delta,
            ResourceDelta {
                utime: 5,
                stime: 2,
                max_memory: 1200
            }
        );
    }

    #[test]
    fn degraded_after_sample_propagates_negative_delta() {
        let delta = ResourceDelta::between(
            sample(10, 4, 900),
            ResourceSample::default(),
            TickPolicy::Propagate,
        );
        assert_eq!(delta.utime, -10);
        assert_eq!(delta.stime, -4);
        assert_eq!(delta.max_memory, 0);
        assert!(delta.has_negative_ticks());
    }

    #[test]
    fn degraded_after_sample_clamps_to_zero() {
        let delta = ResourceDelta::between(
            sample(10, 4, 900),
            ResourceSample::default(),
            TickPolicy::Clamp,
        );
        assert_eq!((delta.utime, delta.stime), (0, 0));
        assert!(!delta.has_negative_ticks());
    }

    #[test]
    fn degraded_before_sample_inflates_delta() {
        let delta = ResourceDelta::between(
            ResourceSample::default(),
            sample(10, 4, 900),
            TickPolicy::Clamp,
        );
        assert_eq!((delta.utime, delta.stime), (10, 4));
    }

    #[test]
    fn extreme_samples_saturate_instead_of_overflowing() {
        let delta = ResourceDelta::between(
            sample(i64::MIN, 0, 0),
            sample(5, i64::MIN, 0),
            TickPolicy::Propagate,
        );
        assert_eq!(delta.utime, i64::MAX);
        assert_eq!(delta.stime, i64::MIN);

        let clamped = ResourceDelta::between(
            sample(i64::MAX, 0, 0),
            sample(-1, 0, 0),
            TickPolicy::Clamp,
        );
        assert_eq!(clamped.utime, 0);
    }

    #[test]
    fn policy_parses_lowercase() {
        let policy: TickPolicy = serde_json::from_str("\"clamp\"").expect("parse");
        assert_eq!(policy, TickPolicy::Clamp);
    }
}
