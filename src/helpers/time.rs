use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Wall-clock source for the token cache gate.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Absolute distance between two instants, so a clock moved backwards
/// does not keep the gate closed forever.
pub fn elapsed_abs(since: DateTime<Utc>, now: DateTime<Utc>) -> TimeDelta {
    (now - since).abs()
}

pub fn get_instant() -> Instant {
    Instant::now()
}
