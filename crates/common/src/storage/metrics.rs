//! Lock-free counters for pool activity

use std::sync::atomic::{AtomicU64, Ordering};

/// Connection pool counters shared by every caller of a [`super::SqlitePool`].
#[derive(Debug, Default)]
pub struct StorageMetrics {
    connections_acquired: AtomicU64,
    connections_timeout: AtomicU64,
    connections_error: AtomicU64,
    total_acquire_ms: AtomicU64,
    max_pool_size: u32,
}

/// Point-in-time copy of [`StorageMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub connections_acquired: u64,
    pub connections_timeout: u64,
    pub connections_error: u64,
    pub avg_acquire_ms: u64,
    pub max_pool_size: u32,
}

impl StorageMetrics {
    pub fn new(max_pool_size: u32) -> Self {
        Self { max_pool_size, ..Self::default() }
    }

    pub fn record_connection_acquired(&self, duration_ms: u64) {
        self.connections_acquired.fetch_add(1, Ordering::Relaxed);
        self.total_acquire_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn record_connection_timeout(&self) {
        self.connections_timeout.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connection_error(&self) {
        self.connections_error.fetch_add(1, Ordering::Relaxed);
    }

    pub fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        let acquired = self.connections_acquired.load(Ordering::Relaxed);
        let total_ms = self.total_acquire_ms.load(Ordering::Relaxed);
        PoolSnapshot {
            connections_acquired: acquired,
            connections_timeout: self.connections_timeout.load(Ordering::Relaxed),
            connections_error: self.connections_error.load(Ordering::Relaxed),
            avg_acquire_ms: if acquired == 0 { 0 } else { total_ms / acquired },
            max_pool_size: self.max_pool_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_averages_acquisition_time() {
        let metrics = StorageMetrics::new(4);
        metrics.record_connection_acquired(10);
        metrics.record_connection_acquired(30);
        metrics.record_connection_timeout();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.connections_acquired, 2);
        assert_eq!(snapshot.avg_acquire_ms, 20);
        assert_eq!(snapshot.connections_timeout, 1);
        assert_eq!(snapshot.max_pool_size, 4);
    }

    #[test]
    fn empty_snapshot_has_zero_average() {
        assert_eq!(StorageMetrics::new(1).snapshot().avg_acquire_ms, 0);
    }
}
