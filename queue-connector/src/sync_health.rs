//! Public sync-health metadata for topic map refresh attempts.

use std::time::SystemTime;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncHealth {
    pub last_attempt_at: Option<SystemTime>,
    pub last_success_at: Option<SystemTime>,
    pub last_attempt_succeeded: Option<bool>,
    pub previous_attempt_succeeded: Option<bool>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub topic_map_version: u64,
}

impl SyncHealth {
    pub(crate) fn record_success(&mut self, at: SystemTime, topic_map_version: u64) {
        self.previous_attempt_succeeded = self.last_attempt_succeeded;
        self.last_attempt_at = Some(at);
        self.last_success_at = Some(at);
        self.last_attempt_succeeded = Some(true);
        self.consecutive_failures = 0;
        self.last_error = None;
        self.topic_map_version = topic_map_version;
    }

    pub(crate) fn record_failure(&mut self, at: SystemTime, error: String) {
        self.previous_attempt_succeeded = self.last_attempt_succeeded;
        self.last_attempt_at = Some(at);
        self.last_attempt_succeeded = Some(false);
        self.consecutive_failures += 1;
        self.last_error = Some(error);
    }

    /// True once at least one rebuild has been applied.
    pub fn has_synced(&self) -> bool {
        self.last_success_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::SyncHealth;
    use std::time::SystemTime;

    #[test]
    fn failure_after_success_keeps_last_success_time() {
        let mut health = SyncHealth::default();
        let first = SystemTime::now();

        health.record_success(first, 1);
        health.record_failure(SystemTime::now(), "gateway unreachable".to_string());

        assert!(health.has_synced());
        assert_eq!(health.last_success_at, Some(first));
        assert_eq!(health.last_attempt_succeeded, Some(false));
        assert_eq!(health.previous_attempt_succeeded, Some(true));
        assert_eq!(health.consecutive_failures, 1);
        assert_eq!(health.topic_map_version, 1);
    }

    #[test]
    fn success_clears_failure_streak() {
        let mut health = SyncHealth::default();

        health.record_failure(SystemTime::now(), "a".to_string());
        health.record_failure(SystemTime::now(), "b".to_string());
        assert_eq!(health.consecutive_failures, 2);
        assert!(!health.has_synced());

        health.record_success(SystemTime::now(), 3);
        assert_eq!(health.consecutive_failures, 0);
        assert!(health.last_error.is_none());
        assert_eq!(health.topic_map_version, 3);
    }
}
