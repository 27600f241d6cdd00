//! Savings aggregation
//!
//! Pure arithmetic over two [`MeasurementResult`]s; nothing here touches the
//! heap or a window.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::MeasurementResult;
use super::MeasureError;

/// Savings of one optimized/baseline pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    /// Instances allocated on each side
    pub object_count: usize,
    /// Heap growth of the optimized layout
    pub optimized_bytes: u64,
    /// Heap growth of the baseline layout
    pub baseline_bytes: u64,
    /// `baseline_bytes - optimized_bytes`; negative when the optimized side grew more
    pub saved_bytes: i64,
    /// Share of the baseline saved, in `(0, 100]`, or 0 when nothing was saved
    pub saved_percent: f64,
    /// Approximate saving per instance
    pub per_object_saved_bytes: f64,
    /// Either measurement carried a fault
    pub suspect: bool,
}

/// Reasons two measurements cannot be combined
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavingsError {
    /// The two sides allocated different numbers of objects
    #[error("object counts differ: optimized {optimized}, baseline {baseline}")]
    MismatchedObjectCount {
        /// Count measured for the optimized layout
        optimized: usize,
        /// Count measured for the baseline layout
        baseline: usize,
    },

    /// The pair could not be measured at all
    #[error(transparent)]
    Measurement(#[from] MeasureError),
}

/// Combine an optimized and a baseline measurement into a [`SavingsReport`]
///
/// # Examples
///
/// ```
/// use layout_delta::memory::{combine, MeasurementResult};
///
/// let measured = |bytes| MeasurementResult {
///     type_label: "T".into(),
///     object_count: 1000,
///     delta_bytes: bytes,
///     fault: None,
/// };
///
/// let report = combine(&measured(40_000), &measured(56_000)).unwrap();
/// assert_eq!(report.saved_bytes, 16_000);
/// assert_eq!(report.per_object_saved_bytes, 16.0);
/// ```
///
/// # Errors
///
/// [`SavingsError::MismatchedObjectCount`] when the object counts differ.
pub fn combine(
    optimized: &MeasurementResult,
    baseline: &MeasurementResult,
) -> Result<SavingsReport, SavingsError> {
    if optimized.object_count != baseline.object_count {
        return Err(SavingsError::MismatchedObjectCount {
            optimized: optimized.object_count,
            baseline: baseline.object_count,
        });
    }

    let object_count = optimized.object_count;
    let saved = i128::from(baseline.delta_bytes) - i128::from(optimized.delta_bytes);
    let saved_bytes = i64::try_from(saved).unwrap_or(if saved < 0 { i64::MIN } else { i64::MAX });

    let saved_percent = if baseline.delta_bytes > optimized.delta_bytes {
        saved_bytes as f64 / baseline.delta_bytes as f64 * 100.0
    } else {
        0.0
    };

    let per_object_saved_bytes = if object_count == 0 {
        0.0
    } else {
        saved_bytes as f64 / object_count as f64
    };

    Ok(SavingsReport {
        object_count,
        optimized_bytes: optimized.delta_bytes,
        baseline_bytes: baseline.delta_bytes,
        saved_bytes,
        saved_percent,
        per_object_saved_bytes,
        suspect: optimized.is_suspect() || baseline.is_suspect(),
    })
}

/// Total saved bytes across reports; 0 for an empty slice
pub fn accumulate(reports: &[SavingsReport]) -> i64 {
    reports
        .iter()
        .fold(0i64, |total, report| total.saturating_add(report.saved_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::engine::MeasurementFault;

    fn measured(count: usize, bytes: u64) -> MeasurementResult {
        MeasurementResult {
            type_label: "Entity".to_string(),
            object_count: count,
            delta_bytes: bytes,
            fault: None,
        }
    }

    fn report_with_savings(saved_bytes: i64) -> SavingsReport {
        SavingsReport {
            object_count: 1,
            optimized_bytes: 0,
            baseline_bytes: saved_bytes.max(0) as u64,
            saved_bytes,
            saved_percent: 0.0,
            per_object_saved_bytes: 0.0,
            suspect: false,
        }
    }

    #[test]
    fn test_combine_reference_example() {
        let report = combine(&measured(1000, 40_000), &measured(1000, 56_000)).unwrap();

        assert_eq!(report.saved_bytes, 16_000);
        assert!((report.saved_percent - 28.571_428).abs() < 1e-3);
        assert_eq!(report.per_object_saved_bytes, 16.0);
        assert!(!report.suspect);
    }

    #[test]
    fn test_combine_is_deterministic() {
        let optimized = measured(333, 12_345);
        let baseline = measured(333, 99_999);

        let first = combine(&optimized, &baseline).unwrap();
        let second = combine(&optimized, &baseline).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.saved_percent.to_bits(), second.saved_percent.to_bits());
    }

    #[test]
    fn test_percent_is_zero_when_nothing_saved() {
        let equal = combine(&measured(10, 500), &measured(10, 500)).unwrap();
        assert_eq!(equal.saved_percent, 0.0);
        assert_eq!(equal.saved_bytes, 0);

        let worse = combine(&measured(10, 800), &measured(10, 500)).unwrap();
        assert_eq!(worse.saved_percent, 0.0);
        assert_eq!(worse.saved_bytes, -300);
        assert_eq!(worse.per_object_saved_bytes, -30.0);
    }

    #[test]
    fn test_percent_never_exceeds_hundred() {
        let report = combine(&measured(10, 0), &measured(10, 4096)).unwrap();
        assert_eq!(report.saved_percent, 100.0);
    }

    #[test]
    fn test_mismatched_counts_are_rejected() {
        let err = combine(&measured(100, 1), &measured(200, 2)).unwrap_err();
        assert_eq!(
            err,
            SavingsError::MismatchedObjectCount {
                optimized: 100,
                baseline: 200
            }
        );
    }

    #[test]
    fn test_zero_count_pair_has_zero_per_object() {
        let report = combine(&measured(0, 0), &measured(0, 0)).unwrap();
        assert_eq!(report.per_object_saved_bytes, 0.0);
        assert_eq!(report.saved_percent, 0.0);
    }

    #[test]
    fn test_faulted_input_marks_report_suspect() {
        let mut baseline = measured(10, 0);
        baseline.fault = Some(MeasurementFault::NegativeDelta { shrank_by: 64 });

        let report = combine(&measured(10, 100), &baseline).unwrap();
        assert!(report.suspect);
    }

    #[test]
    fn test_accumulate() {
        assert_eq!(accumulate(&[]), 0);
        assert_eq!(
            accumulate(&[report_with_savings(500), report_with_savings(1500)]),
            2000
        );
        assert_eq!(
            accumulate(&[report_with_savings(500), report_with_savings(-200)]),
            300
        );
    }
}
