//! Delta measurement engine
//!
//! One measurement allocates a single contiguous collection of `N` populated
//! instances of a type inside an open [`MeasurementWindow`] and reports how
//! much the heap grew:
//!
//! 1. sample the heap (`before`)
//! 2. allocate and populate `N` instances
//! 3. sample the heap again (`after`) while the collection is still alive
//! 4. `delta = after - before`; a negative delta is flagged as a fault
//! 5. read one field back so the collection is observably used, then hand it
//!    to the window, which releases it on cleanup
//!
//! The engine is type-erased: a [`Workload`] carries the allocate-and-populate
//! closure for one concrete type, so a single entry point serves every shape.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::hint::black_box;

use super::layout::LayoutDescriptor;
use super::sampler::HeapSampler;
use super::window::{CollectionController, MeasurementWindow};
use super::MeasureError;

/// Types that can be bulk-allocated with representative data
///
/// Implementations write varied, non-zero values into the scalar fields so a
/// collection cannot be represented more cheaply than a real one. Container
/// fields may stay empty; empty containers do not allocate.
pub trait Populate: Sized + 'static {
    /// Build the `index`-th instance
    fn populate(index: usize, rng: &mut StdRng) -> Self;

    /// A field value read back after the measurement
    fn probe(&self) -> u64;
}

type AllocateFn = Box<dyn Fn(usize, u64) -> Box<dyn Any>>;
type ProbeFn = Box<dyn Fn(&dyn Any) -> Option<u64>>;

/// Labeled allocate-and-populate closure for one type
pub struct Workload {
    label: String,
    layout: LayoutDescriptor,
    allocate: AllocateFn,
    probe: ProbeFn,
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload")
            .field("label", &self.label)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl Workload {
    /// Workload allocating a `Vec<T>` populated through [`Populate`]
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_delta::memory::{Populate, Workload};
    /// use rand::rngs::StdRng;
    /// use rand::Rng;
    ///
    /// #[repr(C)]
    /// struct Reading {
    ///     value: u64,
    ///     valid: bool,
    /// }
    ///
    /// impl Populate for Reading {
    ///     fn populate(index: usize, rng: &mut StdRng) -> Self {
    ///         Reading { value: index as u64 + rng.gen_range(1..100), valid: true }
    ///     }
    ///
    ///     fn probe(&self) -> u64 {
    ///         self.value
    ///     }
    /// }
    ///
    /// let workload = Workload::of::<Reading>("Reading");
    /// assert_eq!(workload.layout().size, 16);
    /// ```
    pub fn of<T: Populate>(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            layout: LayoutDescriptor::of::<T>(),
            allocate: Box::new(|count: usize, seed: u64| {
                let mut rng = StdRng::seed_from_u64(seed);
                let items: Vec<T> = (0..count).map(|i| T::populate(i, &mut rng)).collect();
                Box::new(items) as Box<dyn Any>
            }),
            probe: Box::new(|collection: &dyn Any| {
                collection
                    .downcast_ref::<Vec<T>>()
                    .and_then(|items| items.first())
                    .map(T::probe)
            }),
        }
    }

    /// Workload from an arbitrary closure
    ///
    /// The closure receives the object count and an rng seed and returns the
    /// populated collection. Nothing is probed after measurement beyond
    /// keeping the collection alive.
    pub fn from_fn<F>(label: impl Into<String>, layout: LayoutDescriptor, allocate: F) -> Self
    where
        F: Fn(usize, u64) -> Box<dyn Any> + 'static,
    {
        Self {
            label: label.into(),
            layout,
            allocate: Box::new(allocate),
            probe: Box::new(|_: &dyn Any| None),
        }
    }

    /// Replace the size-only layout with a field-level one
    pub fn with_layout(mut self, layout: LayoutDescriptor) -> Self {
        self.layout = layout;
        self
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Static layout of the allocated type
    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }
}

/// Why a measurement is suspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeasurementFault {
    /// The heap shrank while the workload allocated
    #[error("heap shrank by {shrank_by} bytes during allocation")]
    NegativeDelta {
        /// Bytes the heap lost between the two samples
        shrank_by: u64,
    },
}

/// Outcome of one engine run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Label of the measured workload
    pub type_label: String,
    /// Instances allocated
    pub object_count: usize,
    /// Heap growth in bytes; 0 when `fault` is set
    pub delta_bytes: u64,
    /// Set when the delta could not be trusted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<MeasurementFault>,
}

impl MeasurementResult {
    /// Whether the measurement carries a fault
    pub fn is_suspect(&self) -> bool {
        self.fault.is_some()
    }

    /// Heap growth divided by object count (approximate)
    pub fn bytes_per_object(&self) -> f64 {
        if self.object_count == 0 {
            0.0
        } else {
            self.delta_bytes as f64 / self.object_count as f64
        }
    }
}

/// Runs measurements
#[derive(Debug, Clone, Copy)]
pub struct DeltaEngine {
    seed: u64,
}

impl Default for DeltaEngine {
    fn default() -> Self {
        Self::new(0x5EED_F1E1_D0DE_u64)
    }
}

impl DeltaEngine {
    /// Engine populating workloads from `seed`
    ///
    /// Every workload is populated from the same seed, so both sides of a
    /// pair receive identical values.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed used to populate workloads
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Measure the heap growth of allocating `object_count` instances
    ///
    /// The caller must hold the open `window`; the populated collection is
    /// retained by it and released by its cleanup.
    pub fn measure<S: HeapSampler>(
        &self,
        window: &mut MeasurementWindow<'_, S>,
        workload: &Workload,
        object_count: usize,
    ) -> MeasurementResult {
        if object_count == 0 {
            debug!("{}: zero objects requested, nothing allocated", workload.label);
            return MeasurementResult {
                type_label: workload.label.clone(),
                object_count,
                delta_bytes: 0,
                fault: None,
            };
        }

        let before = window.sample();
        let collection = (workload.allocate)(object_count, self.seed);
        let after = window.sample();

        let delta = after.delta_since(before);
        let (delta_bytes, fault) = match u64::try_from(delta) {
            Ok(bytes) => (bytes, None),
            Err(_) => {
                let shrank_by = u64::try_from(-delta).unwrap_or(u64::MAX);
                warn!(
                    "{}: heap shrank by {} bytes while allocating {} objects; result flagged",
                    workload.label, shrank_by, object_count
                );
                (0, Some(MeasurementFault::NegativeDelta { shrank_by }))
            }
        };

        if let Some(value) = black_box((workload.probe)(&*collection)) {
            debug!("{}: sample value {}", workload.label, value);
        }
        window.retain(collection);

        let result = MeasurementResult {
            type_label: workload.label.clone(),
            object_count,
            delta_bytes,
            fault,
        };
        info!(
            "{}: {} objects ({} bytes each), heap grew {} bytes ({:.2} bytes/object)",
            workload.label,
            object_count,
            workload.layout.size,
            result.delta_bytes,
            result.bytes_per_object()
        );
        result
    }

    /// Open a window, measure once and close the window again
    ///
    /// # Errors
    ///
    /// Fails when no window can be opened; see [`CollectionController::prepare`].
    pub fn measure_isolated<S: HeapSampler>(
        &self,
        controller: &CollectionController<S>,
        workload: &Workload,
        object_count: usize,
    ) -> Result<MeasurementResult, MeasureError> {
        let mut window = controller.prepare()?;
        let result = self.measure(&mut window, workload, object_count);
        window.cleanup();
        Ok(result)
    }
}
