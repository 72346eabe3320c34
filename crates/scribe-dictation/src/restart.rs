//! Auto-restart of single-utterance sessions that end on their own.
//!
//! Engines without continuous mode end the session after every utterance.
//! When that end was not requested by the user, one delayed restart is
//! scheduled. At most one restart is ever pending; scheduling replaces it.

use crate::capability::DeviceProfile;

/// Default delay between an unsolicited end and the restart attempt.
pub const DEFAULT_RESTART_DELAY_MS: u64 = 100;

/// Decides whether an unsolicited session end is followed by a restart.
#[derive(Debug, Clone, Copy)]
pub struct AutoRestartPolicy {
    delay_ms: u64,
}

impl Default for AutoRestartPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RESTART_DELAY_MS)
    }
}

impl AutoRestartPolicy {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Restart only non-continuous profiles whose session ended without a
    /// stop request. Any error that preceded the end is irrelevant.
    pub fn should_restart(&self, profile: &DeviceProfile, user_requested_stop: bool) -> bool {
        !user_requested_stop && !profile.supports_continuous
    }
}

/// The single outstanding delayed restart, if any.
#[derive(Debug, Clone, Default)]
pub struct RestartTimer {
    due_at_ms: Option<u64>,
}

impl RestartTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a restart `delay_ms` after `now_ms`, replacing any pending one.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) {
        self.due_at_ms = Some(now_ms.saturating_add(delay_ms));
    }

    /// Cancel the pending restart. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.due_at_ms.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.due_at_ms.is_some()
    }

    /// Milliseconds until the pending restart is due (zero if overdue).
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.due_at_ms.map(|due| due.saturating_sub(now_ms))
    }

    /// Consume the pending restart if it is due at `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> bool {
        match self.due_at_ms {
            Some(due) if now_ms >= due => {
                self.due_at_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_restarts_mobile_unsolicited_end() {
        let policy = AutoRestartPolicy::default();
        assert!(policy.should_restart(&DeviceProfile::mobile(), false));
    }

    #[test]
    fn test_policy_never_restarts_after_stop() {
        let policy = AutoRestartPolicy::default();
        assert!(!policy.should_restart(&DeviceProfile::mobile(), true));
    }

    #[test]
    fn test_policy_never_restarts_continuous_profile() {
        let policy = AutoRestartPolicy::default();
        assert!(!policy.should_restart(&DeviceProfile::desktop(), false));
    }

    #[test]
    fn test_timer_fires_only_when_due() {
        let mut timer = RestartTimer::new();
        timer.schedule(1_000, 100);
        assert!(timer.is_pending());
        assert_eq!(timer.remaining_ms(1_040), Some(60));
        assert!(!timer.take_due(1_099));
        assert!(timer.take_due(1_100));
        assert!(!timer.is_pending());
        assert!(!timer.take_due(5_000));
    }

    #[test]
    fn test_timer_schedule_replaces_pending() {
        let mut timer = RestartTimer::new();
        timer.schedule(0, 100);
        timer.schedule(50, 100);
        assert!(!timer.take_due(100));
        assert!(timer.take_due(150));
    }

    #[test]
    fn test_timer_cancel() {
        let mut timer = RestartTimer::new();
        assert!(!timer.cancel());
        timer.schedule(0, 100);
        assert!(timer.cancel());
        assert_eq!(timer.remaining_ms(0), None);
        assert!(!timer.take_due(1_000));
    }
}
