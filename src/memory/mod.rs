//! Memory delta measurement
//!
//! Heap accounting, measurement windows, layout inspection and the engine
//! that turns "allocate N of these" into a byte count. The savings
//! aggregator and the per-test outcome types live here as well, since every
//! renderer consumes them.
//!
//! # Examples
//!
//! ```no_run
//! use layout_delta::memory::{CollectionController, DeltaEngine, Populate, Workload, combine};
//! use rand::rngs::StdRng;
//! use rand::Rng;
//!
//! #[repr(C)]
//! struct Packed { id: u64, flag: bool }
//! #[repr(C)]
//! struct Loose { flag: bool, id: u64, more: bool }
//!
//! impl Populate for Packed {
//!     fn populate(i: usize, rng: &mut StdRng) -> Self {
//!         Packed { id: i as u64 + rng.gen_range(1..10), flag: true }
//!     }
//!     fn probe(&self) -> u64 { self.id }
//! }
//! impl Populate for Loose {
//!     fn populate(i: usize, rng: &mut StdRng) -> Self {
//!         Loose { flag: true, id: i as u64 + rng.gen_range(1..10), more: false }
//!     }
//!     fn probe(&self) -> u64 { self.id }
//! }
//!
//! let controller = CollectionController::new();
//! let engine = DeltaEngine::default();
//! let optimized = engine.measure_isolated(&controller, &Workload::of::<Packed>("Packed"), 10_000)?;
//! let baseline = engine.measure_isolated(&controller, &Workload::of::<Loose>("Loose"), 10_000)?;
//! let report = combine(&optimized, &baseline)?;
//! println!("saved {} bytes", report.saved_bytes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod allocator;
pub mod engine;
pub mod layout;
pub mod outcome;
pub mod sampler;
pub mod savings;
pub mod window;

pub use allocator::{AllocatorStats, TrackingAllocator};
pub use engine::{DeltaEngine, MeasurementFault, MeasurementResult, Populate, Workload};
pub use layout::{FieldLayout, LayoutComparison, LayoutDescriptor};
pub use outcome::{EntityReport, StatValue, TestOutcome};
pub use sampler::{HeapSampler, HeapSnapshot, ScriptedSampler, TrackingSampler};
pub use savings::{accumulate, combine, SavingsError, SavingsReport};
pub use window::{CleanupReport, CollectionController, MeasurementWindow};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment failures that prevent a measurement from running
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureError {
    /// The tracking allocator is not installed as the global allocator
    #[error("heap statistics unavailable: the tracking allocator is not installed")]
    HeapStatsUnavailable,

    /// Another measurement window is still open
    #[error("a measurement window is already open")]
    WindowBusy,
}

/// Serializes tests that open measurement windows
///
/// The window slot is process-wide and the test harness runs tests on
/// several threads.
#[cfg(test)]
pub(crate) fn test_lock() -> parking_lot::MutexGuard<'static, ()> {
    static LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
    LOCK.lock()
}
