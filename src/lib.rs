#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! layout-delta library
//!
//! This library measures how much heap a program saves when struct fields are
//! ordered to minimize padding. It can be used programmatically in addition
//! to the CLI interface.
//!
//! Measurements read live heap bytes from [`memory::TrackingAllocator`],
//! which the host binary must install as its global allocator.
//!
//! # Basic Example
//!
//! Comparing two layouts statically:
//!
//! ```
//! use layout_delta::models::{compare, SmallOptimized, SmallUnoptimized};
//!
//! let layouts = compare::<SmallOptimized, SmallUnoptimized>();
//! assert!(layouts.waste_per_instance() > 0);
//! assert!(layouts.optimized.size < layouts.baseline.size);
//! ```
//!
//! # Advanced Example: Combining Measurements
//!
//! Turning two heap deltas into a savings report:
//!
//! ```
//! use layout_delta::memory::{combine, MeasurementResult};
//!
//! let optimized = MeasurementResult {
//!     type_label: "Optimized".to_string(),
//!     object_count: 1000,
//!     delta_bytes: 40_000,
//!     fault: None,
//! };
//! let baseline = MeasurementResult {
//!     type_label: "Baseline".to_string(),
//!     delta_bytes: 56_000,
//!     ..optimized.clone()
//! };
//!
//! let report = combine(&optimized, &baseline).unwrap();
//! assert_eq!(report.saved_bytes, 16_000);
//! assert_eq!(report.per_object_saved_bytes, 16.0);
//! ```
//!
//! # Advanced Example: Running a Test
//!
//! ```no_run
//! use layout_delta::memory::{TrackingAllocator, TrackingSampler};
//! use layout_delta::suite::{self, RunContext, RunSettings};
//!
//! #[global_allocator]
//! static ALLOCATOR: TrackingAllocator = TrackingAllocator::system();
//!
//! let settings = RunSettings::default().with_scale(0.01);
//! let sampler = TrackingSampler;
//! let ctx = RunContext::new(&sampler, settings.seed);
//!
//! for test in suite::select(&["struct-small".to_string()])? {
//!     let outcome = test.run(&settings, &ctx);
//!     println!("{}: {} bytes saved", outcome.name, outcome.total_saved_bytes);
//! }
//! # Ok::<(), layout_delta::error::LayoutDeltaError>(())
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file loading
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Heap accounting, measurement windows and savings arithmetic
pub mod memory;
/// Optimized and baseline struct pairs
pub mod models;
/// Terminal, HTML and JSON rendering
pub mod report;
/// Memory test families and their registry
pub mod suite;

#[cfg(test)]
#[global_allocator]
static TEST_ALLOCATOR: memory::TrackingAllocator = memory::TrackingAllocator::system();
