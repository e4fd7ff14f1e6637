//! Wall-clock source for task ids and creation timestamps.

use chrono::{DateTime, Utc};

/// Time source injected into services so tests can pin "now".
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the host system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
