//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Assertion helpers for measured sizes and ratios
//! - Fixture helpers for project directories with a `.layout-delta.toml`
//! - A lock that serializes heap measurements within one test binary
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::assertions::*;
//!
//! fn test_stable_measurement() {
//!     let _guard = common::measurement_lock();
//!     assert_within_ratio(first, second, 0.15);
//! }
//! ```

pub mod assertions;
pub mod fixtures;

use layout_delta::memory::TrackingAllocator;
use parking_lot::{const_mutex, Mutex, MutexGuard};

// Every test binary that includes this module measures through the same
// counting allocator the CLI installs.
#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator::system();

static MEASUREMENT: Mutex<()> = const_mutex(());

/// Hold while measuring; the heap counters are process-wide
#[allow(dead_code)]
pub fn measurement_lock() -> MutexGuard<'static, ()> {
    MEASUREMENT.lock()
}

/// Check if running in CI environment
#[allow(dead_code)]
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}
