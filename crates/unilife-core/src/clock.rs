//! Time source for event timestamps.

use chrono::{DateTime, Utc};

/// Supplies `occurred_at` for recorded events. Injected so replayed and
/// freshly recorded sessions can be compared in tests.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, used by the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
