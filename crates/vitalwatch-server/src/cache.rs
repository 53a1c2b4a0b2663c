//! Single-slot store for the most recent prediction.
//!
//! The slot holds an `Arc<LatestReading>`; `update` swaps the whole `Arc`
//! under a write lock, so readers always observe either the previous or the
//! next result in full, never a mix of fields.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{LatestReading, PredictionResult};

/// Latest-reading cache
#[derive(Debug, Default)]
pub struct LatestReadingCache {
    slot: RwLock<Arc<LatestReading>>,
}

impl LatestReadingCache {
    /// Create an empty cache (placeholder state)
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached reading
    pub fn update(&self, result: PredictionResult) {
        let next = Arc::new(LatestReading::Ready(result));
        *self.slot.write() = next;
    }

    /// Current reading; cheap to clone and safe to hold across awaits
    pub fn read(&self) -> Arc<LatestReading> {
        Arc::clone(&self.slot.read())
    }

    /// Whether a prediction has been cached yet
    pub fn is_pending(&self) -> bool {
        matches!(**self.slot.read(), LatestReading::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn result(heart_rate: i64) -> PredictionResult {
        PredictionResult {
            heart_rate,
            spo2: 98,
            activity: "Walking".into(),
            anomaly: "Normal".into(),
            suggestion: "Vitals are within a healthy range. Keep monitoring.".into(),
        }
    }

    #[test]
    fn test_starts_pending() {
        let cache = LatestReadingCache::new();
        assert!(cache.is_pending());
        assert_eq!(*cache.read(), LatestReading::Pending);
    }

    #[test]
    fn test_update_replaces_wholesale() {
        let cache = LatestReadingCache::new();
        cache.update(result(72));
        cache.update(result(80));

        let latest = cache.read();
        assert!(!cache.is_pending());
        assert_eq!(latest.result().map(|r| r.heart_rate), Some(80));
    }

    #[test]
    fn test_snapshot_survives_later_updates() {
        let cache = LatestReadingCache::new();
        cache.update(result(60));
        let snapshot = cache.read();
        cache.update(result(120));

        assert_eq!(snapshot.result().map(|r| r.heart_rate), Some(60));
        assert_eq!(cache.read().result().map(|r| r.heart_rate), Some(120));
    }

    #[test]
    fn test_concurrent_writers_never_tear() {
        let cache = Arc::new(LatestReadingCache::new());

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for n in 0..200 {
                        let hr = i * 1000 + n;
                        cache.update(PredictionResult {
                            heart_rate: hr,
                            spo2: hr,
                            ..result(0)
                        });
                    }
                })
            })
            .collect();

        for _ in 0..500 {
            if let Some(r) = cache.read().result() {
                assert_eq!(r.heart_rate, r.spo2);
            }
        }

        for w in writers {
            w.join().unwrap();
        }
    }
}
