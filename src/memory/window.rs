//! Measurement windows
//!
//! The [`CollectionController`] opens a [`MeasurementWindow`]: an exclusive,
//! process-wide interval during which nothing measured is reclaimed. Every
//! collection allocated inside the window is retained by it and released in
//! one sweep when the window closes, so the heap delta of a measurement
//! reflects only its own allocations.
//!
//! Only one window may be open at a time. Closing happens in
//! [`MeasurementWindow::cleanup`] or, on any other exit path (early return,
//! `?`, panic unwinding), in `Drop`.

use log::{debug, warn};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

use super::sampler::{HeapSampler, HeapSnapshot, TrackingSampler};
use super::MeasureError;

static WINDOW_OPEN: AtomicBool = AtomicBool::new(false);

/// Returns true while any measurement window is open in this process
pub fn window_open() -> bool {
    WINDOW_OPEN.load(Ordering::Acquire)
}

/// Opens measurement windows against a heap sampler
#[derive(Debug, Default)]
pub struct CollectionController<S: HeapSampler = TrackingSampler> {
    sampler: S,
}

impl CollectionController<TrackingSampler> {
    /// Controller reading the tracking allocator
    pub fn new() -> Self {
        Self {
            sampler: TrackingSampler,
        }
    }
}

impl<S: HeapSampler> CollectionController<S> {
    /// Controller reading a custom sampler
    pub fn with_sampler(sampler: S) -> Self {
        Self { sampler }
    }

    /// The sampler windows are measured with
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Open a measurement window
    ///
    /// Claims the process-wide window slot, suspends reclamation of measured
    /// collections and captures the baseline heap reading.
    ///
    /// # Errors
    ///
    /// - [`MeasureError::HeapStatsUnavailable`] if the sampler cannot report
    /// - [`MeasureError::WindowBusy`] if another window is still open
    pub fn prepare(&self) -> Result<MeasurementWindow<'_, S>, MeasureError> {
        super::sampler::ensure_available(&self.sampler)?;

        if WINDOW_OPEN
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(MeasureError::WindowBusy);
        }

        let baseline = self.sampler.sample();
        debug!("measurement window opened at {}", baseline);

        Ok(MeasurementWindow {
            sampler: &self.sampler,
            baseline,
            retained: Vec::new(),
            closed: false,
        })
    }
}

/// Summary of a closed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    /// Collections that were held by the window
    pub collections: usize,
    /// Heap shrinkage observed while releasing them
    pub released_bytes: u64,
}

/// An open measurement window
///
/// Holds the exclusive window slot until cleaned up or dropped.
pub struct MeasurementWindow<'a, S: HeapSampler = TrackingSampler> {
    sampler: &'a S,
    baseline: HeapSnapshot,
    retained: Vec<Box<dyn Any>>,
    closed: bool,
}

impl<S: HeapSampler> std::fmt::Debug for MeasurementWindow<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasurementWindow")
            .field("baseline", &self.baseline)
            .field("retained", &self.retained.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl<'a, S: HeapSampler> MeasurementWindow<'a, S> {
    /// Heap reading captured when the window opened
    pub fn baseline(&self) -> HeapSnapshot {
        self.baseline
    }

    /// Sample the heap through the window's sampler
    pub fn sample(&self) -> HeapSnapshot {
        self.sampler.sample()
    }

    /// Keep a measured collection alive until the window closes
    pub fn retain(&mut self, collection: Box<dyn Any>) {
        self.retained.push(collection);
    }

    /// Number of collections currently held
    pub fn retained_count(&self) -> usize {
        self.retained.len()
    }

    /// Close the window, releasing everything it retained
    pub fn cleanup(mut self) -> CleanupReport {
        self.close()
    }

    fn close(&mut self) -> CleanupReport {
        let collections = self.retained.len();
        let before = self.sampler.sample();
        self.retained = Vec::new();
        let after = self.sampler.sample();

        self.closed = true;
        WINDOW_OPEN.store(false, Ordering::Release);

        let released_bytes = u64::try_from(before.delta_since(after)).unwrap_or(0);
        debug!(
            "measurement window closed: released {} collections ({} bytes)",
            collections, released_bytes
        );

        CleanupReport {
            collections,
            released_bytes,
        }
    }
}

impl<S: HeapSampler> Drop for MeasurementWindow<'_, S> {
    fn drop(&mut self) {
        if !self.closed {
            if std::thread::panicking() {
                warn!("measurement window closed during unwinding");
            }
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::sampler::ScriptedSampler;
    use crate::memory::test_lock;

    #[test]
    fn test_prepare_captures_baseline() {
        let _guard = test_lock();
        let controller = CollectionController::with_sampler(ScriptedSampler::new([4096]));

        let window = controller.prepare().expect("window should open");
        assert_eq!(window.baseline(), HeapSnapshot(4096));
        assert!(window_open());
        window.cleanup();
        assert!(!window_open());
    }

    #[test]
    fn test_second_window_is_rejected_while_first_open() {
        let _guard = test_lock();
        let controller = CollectionController::new();

        let first = controller.prepare().expect("first window should open");
        let second = controller.prepare();
        assert!(matches!(second, Err(MeasureError::WindowBusy)));

        first.cleanup();
        let third = controller.prepare().expect("slot should be free again");
        drop(third);
    }

    #[test]
    fn test_drop_releases_window_slot() {
        let _guard = test_lock();
        let controller = CollectionController::new();
        {
            let _window = controller.prepare().expect("window should open");
            assert!(window_open());
        }
        assert!(!window_open());
    }

    #[test]
    fn test_panic_inside_window_still_releases_slot() {
        let _guard = test_lock();
        let result = std::panic::catch_unwind(|| {
            let controller = CollectionController::new();
            let _window = controller.prepare().expect("window should open");
            panic!("workload failed");
        });

        assert!(result.is_err());
        assert!(!window_open());
    }

    #[test]
    fn test_cleanup_releases_retained_collections() {
        let _guard = test_lock();
        let controller = CollectionController::new();
        let mut window = controller.prepare().expect("window should open");

        window.retain(Box::new(vec![0xABu8; 1 << 20]));
        window.retain(Box::new(String::from("retained")));
        assert_eq!(window.retained_count(), 2);

        let report = window.cleanup();
        assert_eq!(report.collections, 2);
        assert!(report.released_bytes > (1 << 20) / 2);
    }

    #[test]
    fn test_unavailable_heap_stats_prevent_opening() {
        let _guard = test_lock();
        let controller = CollectionController::with_sampler(ScriptedSampler::unavailable());
        assert!(matches!(
            controller.prepare(),
            Err(MeasureError::HeapStatsUnavailable)
        ));
        assert!(!window_open());
    }
}
