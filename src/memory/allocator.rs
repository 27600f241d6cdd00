//! Counting global allocator
//!
//! Wraps another [`GlobalAlloc`] (the system allocator by default) and keeps
//! process-wide counters of live bytes, peak bytes and allocation calls. This
//! is the heap accounting every measurement reads from.
//!
//! # Examples
//!
//! ```no_run
//! use layout_delta::memory::TrackingAllocator;
//!
//! #[global_allocator]
//! static ALLOCATOR: TrackingAllocator = TrackingAllocator::system();
//!
//! let stats = layout_delta::memory::allocator::stats();
//! println!("{} bytes live", stats.live_bytes);
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
static PEAK_BYTES: AtomicU64 = AtomicU64::new(0);
static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static DEALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Global allocator wrapper that records heap usage
pub struct TrackingAllocator<A = System> {
    inner: A,
}

impl TrackingAllocator<System> {
    /// Tracking allocator backed by the system allocator
    pub const fn system() -> Self {
        Self { inner: System }
    }
}

impl<A> TrackingAllocator<A> {
    /// Tracking allocator backed by a custom allocator
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[inline]
fn record_alloc(size: usize) {
    ACTIVE.store(true, Ordering::Relaxed);
    ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    let live = LIVE_BYTES.fetch_add(size as u64, Ordering::Relaxed) + size as u64;
    PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
}

#[inline]
fn record_dealloc(size: usize) {
    DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    LIVE_BYTES.fetch_sub(size as u64, Ordering::Relaxed);
}

// SAFETY: every call is forwarded unchanged to the wrapped allocator; the
// wrapper only updates atomic counters and never allocates itself.
unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = self.inner.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record_dealloc(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// Point-in-time copy of the allocator counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Bytes currently allocated and not yet freed
    pub live_bytes: u64,
    /// Highest value `live_bytes` has reached
    pub peak_bytes: u64,
    /// Number of successful allocation calls (reallocs count once)
    pub allocations: u64,
    /// Number of deallocation calls (reallocs count once)
    pub deallocations: u64,
}

/// Read the current counters
pub fn stats() -> AllocatorStats {
    AllocatorStats {
        live_bytes: LIVE_BYTES.load(Ordering::Relaxed),
        peak_bytes: PEAK_BYTES.load(Ordering::Relaxed),
        allocations: ALLOCATIONS.load(Ordering::Relaxed),
        deallocations: DEALLOCATIONS.load(Ordering::Relaxed),
    }
}

/// Bytes currently live on the heap
#[inline]
pub fn live_bytes() -> u64 {
    LIVE_BYTES.load(Ordering::Relaxed)
}

/// Whether a [`TrackingAllocator`] is installed and has seen traffic
///
/// A Rust program allocates before `main` runs, so this is true for any
/// binary that installs the allocator with `#[global_allocator]`.
pub fn is_active() -> bool {
    ACTIVE.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_active_in_test_binary() {
        let _warm = vec![1u8; 16];
        assert!(is_active());
    }

    #[test]
    fn test_stats_counts_allocations() {
        let before = stats();
        let data = vec![7u64; 256];
        let after = stats();

        assert!(after.allocations > before.allocations);
        assert!(after.peak_bytes >= 256 * 8);
        assert_eq!(data[255], 7);
    }

    #[test]
    fn test_realloc_tracks_new_size() {
        let mut data: Vec<u8> = Vec::with_capacity(8);
        data.extend_from_slice(&[1; 8]);
        let before = stats();
        data.reserve_exact(4096);
        let after = stats();

        assert!(after.allocations > before.allocations);
        assert!(after.deallocations > before.deallocations);
        assert!(after.peak_bytes >= 4096);
    }
}
