//! Monotonic visit counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Number of visits to `GET /` since the process started.
///
/// Starts at zero and only ever grows. Increments from concurrent visits are
/// never lost.
#[derive(Debug, Default)]
pub struct VisitorCounter {
    visits: AtomicU64,
}

impl VisitorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one visit.
    pub fn increment(&self) {
        self.visits.fetch_add(1, Ordering::Relaxed);
    }

    /// Current number of visits.
    pub fn current(&self) -> u64 {
        self.visits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(VisitorCounter::new().current(), 0);
    }

    #[test]
    fn test_increment_is_exact() {
        let counter = VisitorCounter::new();
        for _ in 0..10 {
            counter.increment();
        }
        assert_eq!(counter.current(), 10);
    }

    #[test]
    fn test_no_lost_updates_under_contention() {
        let counter = VisitorCounter::new();
        counter.increment();

        thread::scope(|s| {
            for _ in 0..1000 {
                s.spawn(|| counter.increment());
            }
        });

        assert_eq!(counter.current(), 1001);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_tasks() {
        let counter = Arc::new(VisitorCounter::new());

        let tasks: Vec<_> = (0..2000)
            .map(|_| {
                let counter = counter.clone();
                tokio::spawn(async move { counter.increment() })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(counter.current(), 2000);
    }
}
