//! Heap sampling
//!
//! A [`HeapSampler`] reports how many bytes are live on the heap right now.
//! The real implementation reads the [`TrackingAllocator`] counters; tests can
//! substitute a sampler that replays scripted readings.
//!
//! [`TrackingAllocator`]: super::TrackingAllocator

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::allocator;
use super::MeasureError;

/// Bytes live on the heap at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeapSnapshot(pub u64);

impl HeapSnapshot {
    /// Raw byte count
    pub fn bytes(self) -> u64 {
        self.0
    }

    /// Signed difference `self - before`
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_delta::memory::HeapSnapshot;
    ///
    /// assert_eq!(HeapSnapshot(1500).delta_since(HeapSnapshot(1000)), 500);
    /// assert_eq!(HeapSnapshot(900).delta_since(HeapSnapshot(1000)), -100);
    /// ```
    pub fn delta_since(self, before: HeapSnapshot) -> i128 {
        i128::from(self.0) - i128::from(before.0)
    }
}

impl fmt::Display for HeapSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

/// Source of live-heap readings
pub trait HeapSampler {
    /// Bytes currently live on the heap
    fn sample(&self) -> HeapSnapshot;

    /// Whether this sampler can report heap statistics at all
    fn is_available(&self) -> bool;
}

/// Sampler backed by the process-wide tracking allocator
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingSampler;

impl HeapSampler for TrackingSampler {
    fn sample(&self) -> HeapSnapshot {
        HeapSnapshot(allocator::live_bytes())
    }

    fn is_available(&self) -> bool {
        allocator::is_active()
    }
}

impl<S: HeapSampler + ?Sized> HeapSampler for &S {
    fn sample(&self) -> HeapSnapshot {
        (**self).sample()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Fail with [`MeasureError::HeapStatsUnavailable`] when the sampler cannot report
pub fn ensure_available<S: HeapSampler + ?Sized>(sampler: &S) -> Result<(), MeasureError> {
    if sampler.is_available() {
        Ok(())
    } else {
        Err(MeasureError::HeapStatsUnavailable)
    }
}

/// Sampler that replays a fixed sequence of readings
///
/// Once the script is exhausted the last reading repeats. Used to exercise
/// fault paths that a real heap rarely produces.
#[derive(Debug, Default)]
pub struct ScriptedSampler {
    readings: Mutex<VecDeque<u64>>,
    last: AtomicU64,
    available: bool,
}

impl ScriptedSampler {
    /// Sampler returning `readings` in order
    pub fn new(readings: impl IntoIterator<Item = u64>) -> Self {
        Self {
            readings: Mutex::new(readings.into_iter().collect()),
            last: AtomicU64::new(0),
            available: true,
        }
    }

    /// Sampler that reports heap statistics as unavailable
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }
}

impl HeapSampler for ScriptedSampler {
    fn sample(&self) -> HeapSnapshot {
        match self.readings.lock().pop_front() {
            Some(value) => {
                self.last.store(value, Ordering::Relaxed);
                HeapSnapshot(value)
            }
            None => HeapSnapshot(self.last.load(Ordering::Relaxed)),
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_sampler_is_available_with_global_allocator() {
        assert!(TrackingSampler.is_available());
        assert!(ensure_available(&TrackingSampler).is_ok());
    }

    #[test]
    fn test_scripted_sampler_replays_then_repeats_last() {
        let sampler = ScriptedSampler::new([10, 20]);
        assert_eq!(sampler.sample(), HeapSnapshot(10));
        assert_eq!(sampler.sample(), HeapSnapshot(20));
        assert_eq!(sampler.sample(), HeapSnapshot(20));
    }

    #[test]
    fn test_unavailable_sampler_is_environment_fault() {
        let sampler = ScriptedSampler::unavailable();
        assert!(matches!(
            ensure_available(&sampler),
            Err(MeasureError::HeapStatsUnavailable)
        ));
    }

    #[test]
    fn test_delta_since_never_wraps() {
        let before = HeapSnapshot(u64::MAX);
        let after = HeapSnapshot(0);
        assert_eq!(after.delta_since(before), -i128::from(u64::MAX));
    }
}
