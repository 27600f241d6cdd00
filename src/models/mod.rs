//! Measured struct pairs
//!
//! Each pair holds the same fields in two declaration orders: the optimized
//! type sorts fields by alignment, largest first, the unoptimized type
//! scatters small fields between large ones. All types are `#[repr(C)]` so
//! the declared order is the order in memory.

pub mod big;
pub mod multiple;
pub mod small;

pub use big::{LargeOptimized, LargeUnoptimized};
pub use multiple::{
    ApiRequestOptimized, ApiRequestUnoptimized, ConfigOptimized, ConfigUnoptimized,
    DbEntityOptimized, DbEntityUnoptimized, GraphQlQueryOptimized, GraphQlQueryUnoptimized,
};
pub use small::{SmallOptimized, SmallUnoptimized};

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::memory::{LayoutComparison, LayoutDescriptor, Populate, Workload};

/// A measured type with a field-level layout description
pub trait Model: Populate {
    /// Display name used in reports
    const NAME: &'static str;

    /// Layout with every field listed
    fn layout() -> LayoutDescriptor;

    /// Workload allocating this model, carrying its field layout
    fn workload() -> Workload {
        Workload::of::<Self>(Self::NAME).with_layout(Self::layout())
    }
}

/// Layout comparison of an optimized model and its baseline
pub fn compare<O: Model, B: Model>() -> LayoutComparison {
    LayoutComparison::new(O::layout(), B::layout())
}

/// Fixed reference instant so populated timestamps depend only on the rng seed
const REFERENCE_EPOCH_SECS: u64 = 1_700_000_000;

pub(crate) fn timestamp_before(seconds: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(REFERENCE_EPOCH_SECS.saturating_sub(seconds))
}

pub(crate) fn reference_nanos() -> i64 {
    (REFERENCE_EPOCH_SECS as i64) * 1_000_000_000
}
