//! Time sources used to resolve and evaluate document expiration.
//!
//! Buckets never read the system time directly; they ask a [`Clock`]. Production-like
//! setups use [`SystemClock`], while tests inject a [`ManualClock`] so that expiry can be
//! driven deterministically.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::{fmt::Debug, sync::Arc};

/// A provider of the current timestamp.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Shared handle to a clock.
pub type ClockRef = Arc<dyn Clock>;

/// Reads the wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Cloning a `ManualClock` yields a handle to the same instant, so a test can keep one
/// clone and hand another to the bucket.
///
/// # Example
///
/// ```ignore
/// use mockbucket_core::clock::{Clock, ManualClock};
/// use chrono::Duration;
///
/// let clock = ManualClock::default();
/// let start = clock.now();
/// clock.advance(Duration::seconds(30));
/// assert_eq!(clock.now(), start + Duration::seconds(30));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Moves the clock to an absolute instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    /// Moves the clock forward (or backward, for a negative delta).
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.write();
        *guard += delta;
    }
}

impl Default for ManualClock {
    /// Starts at the Unix epoch so that test timestamps are easy to read.
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}
