use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time as UNIX epoch seconds
pub trait Clock: Send + Sync + 'static {
    /// Seconds since the UNIX epoch
    fn now(&self) -> i64;

    /// Milliseconds since the UNIX epoch
    fn now_millis(&self) -> i64 {
        self.now().saturating_mul(1000)
    }
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or_default()
    }

    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> i64 {
        (**self).now()
    }

    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

/// Clock pinned to a settable instant
///
/// Clones share the same instant, so a test can hand one copy to a service
/// and advance the other.
#[derive(Debug, Clone)]
pub struct FixedClock {
    seconds: Arc<AtomicI64>,
}

impl FixedClock {
    pub fn new(seconds: i64) -> Self {
        Self { seconds: Arc::new(AtomicI64::new(seconds)) }
    }

    pub fn set(&self, seconds: i64) {
        self.seconds.store(seconds, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.seconds.load(Ordering::SeqCst)
    }
}
