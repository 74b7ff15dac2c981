use std::time::Duration;

/// Delays before each reconnect attempt; the last one repeats.
const SCHEDULE_MS: [u64; 4] = [0, 2_000, 10_000, 30_000];

/// Fixed, non-adaptive reconnect schedule: immediately, 2s, 10s, then every
/// 30s. Retries forever unless `max_attempts` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: Option<u32>,
}

impl ReconnectPolicy {
    pub fn forever() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }

    /// Delay before the 0-based `attempt`, or `None` once the policy gives up.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if self.max_attempts.is_some_and(|max| attempt >= max) {
            return None;
        }
        let idx = (attempt as usize).min(SCHEDULE_MS.len() - 1);
        Some(Duration::from_millis(SCHEDULE_MS[idx]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_settles_on_thirty_seconds() {
        let policy = ReconnectPolicy::forever();
        let delays: Vec<u64> = (0..7)
            .map(|n| policy.delay_for(n).unwrap().as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![0, 2_000, 10_000, 30_000, 30_000, 30_000, 30_000]);
        assert_eq!(policy.delay_for(10_000), Some(Duration::from_secs(30)));
    }

    #[test]
    fn bounded_policy_gives_up() {
        let policy = ReconnectPolicy::with_max_attempts(2);
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for(2), None);
    }
}
