use chrono::{DateTime, TimeDelta, Utc};

use crate::helpers::time::elapsed_abs;

/// Cached customer token plus the time of the last fetch attempt.
///
/// `last_attempt` moves once per attempt, not per success, so a failing
/// endpoint is still contacted at most once per window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCache {
    pub token: Option<String>,
    pub last_attempt: Option<DateTime<Utc>>,
}

impl TokenCache {
    /// True when no attempt happened yet or the last one is at least `window` away.
    pub fn is_gate_open(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        self.last_attempt
            .map(|last| elapsed_abs(last, now) >= window)
            .unwrap_or(true)
    }

    pub fn mark_attempt(&mut self, now: DateTime<Utc>) {
        self.last_attempt = Some(now);
    }

    pub fn reset(&mut self) {
        self.token = None;
        self.last_attempt = None;
    }
}
