//! Escalating backoff for regions scouts keep failing to reach.
//!
//! Each failure is logged against the region. Once `failure_threshold`
//! failures land inside the trailing `failure_window`, the region cools down
//! for `cooldown_length` ticks and its log is wiped. A successful visit
//! clears the log as well.
//!
//! Cooling regions are skipped by memory and frontier selection only;
//! explicit tasks for them can still be claimed.

use recon_types::{IntelRecord, Tick};

/// Tunables for the failure backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Failures inside the window that trigger a cooldown (default: 3).
    pub failure_threshold: usize,
    /// Trailing window, in ticks, that failures are counted over (default: 1000).
    pub failure_window: Tick,
    /// Cooldown length in ticks (default: 1000).
    pub cooldown_length: Tick,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            failure_window: 1000,
            cooldown_length: 1000,
        }
    }
}

/// Whether the region is cooling down at `now`.
pub fn is_cooling_down(record: &IntelRecord, now: Tick) -> bool {
    record.scout_cooldown_until.is_some_and(|until| until > now)
}

/// Log a failure at `now`.
///
/// Returns `true` if this failure put the region into cooldown.
pub fn record_failure(record: &mut IntelRecord, now: Tick, policy: &BackoffPolicy) -> bool {
    record
        .scout_fail_log
        .retain(|&at| now.saturating_sub(at) < policy.failure_window);
    record.scout_fail_log.push(now);

    if record.scout_fail_log.len() < policy.failure_threshold {
        return false;
    }

    record.scout_cooldown_until = Some(now.saturating_add(policy.cooldown_length));
    record.scout_fail_log.clear();
    true
}

/// Forget all logged failures.
pub fn clear_failures(record: &mut IntelRecord) {
    record.scout_fail_log.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_failure_is_logged() {
        let mut record = IntelRecord::default();
        let cooled = record_failure(&mut record, 100, &BackoffPolicy::default());
        assert!(!cooled);
        assert_eq!(record.scout_fail_log, vec![100]);
        assert!(record.scout_cooldown_until.is_none());
    }

    #[test]
    fn third_failure_in_window_cools_down_and_clears_log() {
        let policy = BackoffPolicy::default();
        let mut record = IntelRecord::default();
        assert!(!record_failure(&mut record, 100, &policy));
        assert!(!record_failure(&mut record, 600, &policy));
        assert!(record_failure(&mut record, 1099, &policy));
        assert_eq!(record.scout_cooldown_until, Some(2099));
        assert!(record.scout_fail_log.is_empty());
        assert!(is_cooling_down(&record, 2098));
        assert!(!is_cooling_down(&record, 2099));
    }

    #[test]
    fn failures_outside_window_are_pruned() {
        let policy = BackoffPolicy::default();
        let mut record = IntelRecord::default();
        record_failure(&mut record, 100, &policy);
        record_failure(&mut record, 200, &policy);
        let cooled = record_failure(&mut record, 1150, &policy);
        assert!(!cooled);
        assert_eq!(record.scout_fail_log, vec![200, 1150]);
    }

    #[test]
    fn log_never_holds_entries_older_than_window() {
        let policy = BackoffPolicy {
            failure_threshold: usize::MAX,
            ..BackoffPolicy::default()
        };
        let mut record = IntelRecord::default();
        for now in (0..10_000).step_by(150) {
            record_failure(&mut record, now, &policy);
            assert!(record.scout_fail_log.iter().all(|&at| now - at < 1000));
        }
    }

    #[test]
    fn clear_failures_empties_log() {
        let mut record = IntelRecord::default();
        record_failure(&mut record, 5, &BackoffPolicy::default());
        clear_failures(&mut record);
        assert!(record.scout_fail_log.is_empty());
    }
}
