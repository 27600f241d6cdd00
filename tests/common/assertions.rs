//! Test assertion helpers
//!
//! Heap deltas move slightly between runs (allocator bookkeeping, lazily
//! initialized runtime state), so measured figures are compared with a
//! tolerance instead of `assert_eq!`.

/// Assert that two floating-point values are approximately equal
///
/// # Examples
///
/// ```
/// # use layout_delta_tests::assertions::assert_approx_eq;
/// assert_approx_eq(report.saved_percent, 28.57, 0.01);
/// ```
#[allow(dead_code)]
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff < epsilon,
        "Float values not approximately equal:\n  actual: {}\n  expected: {}\n  diff: {} (epsilon: {})",
        actual, expected, diff, epsilon
    );
}

/// Assert that two byte counts differ by at most `ratio` of the larger one
///
/// # Examples
///
/// ```
/// # use layout_delta_tests::assertions::assert_within_ratio;
/// // two runs of the same workload within 15%
/// assert_within_ratio(first.delta_bytes, second.delta_bytes, 0.15);
/// ```
#[allow(dead_code)]
pub fn assert_within_ratio(first: u64, second: u64, ratio: f64) {
    let larger = first.max(second);
    let diff = first.abs_diff(second);
    assert!(
        larger == 0 || (diff as f64) <= larger as f64 * ratio,
        "Measurements differ too much:\n  first: {} bytes\n  second: {} bytes\n  diff: {} bytes (allowed: {:.0}%)",
        first,
        second,
        diff,
        ratio * 100.0
    );
}

/// Assert that a measured delta covers at least the static footprint
#[allow(dead_code)]
pub fn assert_covers_footprint(delta_bytes: u64, type_size: usize, object_count: usize) {
    let footprint = (type_size * object_count) as u64;
    assert!(
        delta_bytes >= footprint,
        "Heap delta {} bytes is below the static footprint {} bytes ({} x {})",
        delta_bytes,
        footprint,
        object_count,
        type_size
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_pass() {
        assert_approx_eq(28.571, 28.57, 0.01);
    }

    #[test]
    #[should_panic(expected = "Float values not approximately equal")]
    fn test_assert_approx_eq_fail() {
        assert_approx_eq(0.75, 0.80, 0.01);
    }

    #[test]
    fn test_assert_within_ratio_pass() {
        assert_within_ratio(1_000, 1_100, 0.15);
        assert_within_ratio(0, 0, 0.15);
    }

    #[test]
    #[should_panic(expected = "Measurements differ too much")]
    fn test_assert_within_ratio_fail() {
        assert_within_ratio(1_000, 2_000, 0.15);
    }

    #[test]
    #[should_panic(expected = "below the static footprint")]
    fn test_assert_covers_footprint_fail() {
        assert_covers_footprint(100, 16, 10);
    }
}
