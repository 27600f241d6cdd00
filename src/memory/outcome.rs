//! Per-test results handed to the renderers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::layout::LayoutComparison;
use super::savings::{accumulate, SavingsError, SavingsReport};

/// Auxiliary statistic value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// Whole number
    Int(i64),
    /// Fractional number
    Float(f64),
    /// Free text
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Int(v) => write!(f, "{}", v),
            StatValue::Float(v) => write!(f, "{:.2}", v),
            StatValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        StatValue::Int(value)
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Float(value)
    }
}

impl From<String> for StatValue {
    fn from(value: String) -> Self {
        StatValue::Text(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

/// Result for one optimized/baseline pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityReport {
    /// Entity label, e.g. "API Request"
    pub label: String,
    /// Static layout comparison, when the pair declared one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layouts: Option<LayoutComparison>,
    /// Measured savings, or why the pair has none
    pub savings: Result<SavingsReport, SavingsError>,
}

impl EntityReport {
    /// Whether the entity produced a report that carries a fault
    pub fn is_suspect(&self) -> bool {
        self.savings.as_ref().map(|r| r.suspect).unwrap_or(false)
    }
}

/// Everything one memory test produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Registry key, e.g. `struct-small`
    pub key: String,
    /// Display name
    pub name: String,
    /// Entity results in run order
    pub entities: Vec<EntityReport>,
    /// Sum of saved bytes over entities with a trusted report
    pub total_saved_bytes: i64,
    /// Auxiliary statistics
    pub stats: BTreeMap<String, StatValue>,
}

impl TestOutcome {
    /// Empty outcome for a test
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            entities: Vec::new(),
            total_saved_bytes: 0,
            stats: BTreeMap::new(),
        }
    }

    /// Append an entity and refresh the grand total
    pub fn push_entity(&mut self, entity: EntityReport) {
        self.entities.push(entity);
        self.total_saved_bytes = accumulate(&self.trusted_reports());
    }

    /// Record an auxiliary statistic
    pub fn set_stat(&mut self, name: impl Into<String>, value: impl Into<StatValue>) {
        self.stats.insert(name.into(), value.into());
    }

    /// Reports of entities that were measured successfully
    pub fn reports(&self) -> Vec<SavingsReport> {
        self.entities
            .iter()
            .filter_map(|e| e.savings.as_ref().ok().cloned())
            .collect()
    }

    /// Reports that carry no fault; only these count toward totals
    pub fn trusted_reports(&self) -> Vec<SavingsReport> {
        self.entities
            .iter()
            .filter_map(|e| e.savings.as_ref().ok())
            .filter(|r| !r.suspect)
            .cloned()
            .collect()
    }

    /// Labels of measured entities left out of the totals because of a fault
    pub fn excluded_from_total(&self) -> Vec<&str> {
        self.entities
            .iter()
            .filter(|e| e.is_suspect())
            .map(|e| e.label.as_str())
            .collect()
    }

    /// Entities whose measurement failed
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SavingsError)> {
        self.entities
            .iter()
            .filter_map(|e| e.savings.as_ref().err().map(|err| (e.label.as_str(), err)))
    }

    /// Whether any entity failed or carries a fault
    pub fn has_faults(&self) -> bool {
        self.entities
            .iter()
            .any(|e| e.savings.is_err() || e.is_suspect())
    }

    /// Total baseline bytes over trusted entities
    pub fn total_baseline_bytes(&self) -> u64 {
        self.trusted_reports().iter().map(|r| r.baseline_bytes).sum()
    }

    /// Share of all baseline bytes saved, 0 when nothing was saved
    pub fn total_saved_percent(&self) -> f64 {
        let baseline = self.total_baseline_bytes();
        if baseline == 0 || self.total_saved_bytes <= 0 {
            0.0
        } else {
            self.total_saved_bytes as f64 / baseline as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MeasureError;

    fn report(baseline: u64, optimized: u64) -> SavingsReport {
        SavingsReport {
            object_count: 10,
            optimized_bytes: optimized,
            baseline_bytes: baseline,
            saved_bytes: baseline as i64 - optimized as i64,
            saved_percent: 0.0,
            per_object_saved_bytes: 0.0,
            suspect: false,
        }
    }

    #[test]
    fn test_push_entity_updates_total() {
        let mut outcome = TestOutcome::new("struct-multi", "Multiple Struct Types Test");
        outcome.push_entity(EntityReport {
            label: "A".into(),
            layouts: None,
            savings: Ok(report(1500, 1000)),
        });
        outcome.push_entity(EntityReport {
            label: "B".into(),
            layouts: None,
            savings: Ok(report(3000, 1500)),
        });

        assert_eq!(outcome.total_saved_bytes, 2000);
        assert_eq!(outcome.total_baseline_bytes(), 4500);
        assert!(!outcome.has_faults());
    }

    #[test]
    fn test_failed_entity_is_excluded_from_total() {
        let mut outcome = TestOutcome::new("struct-small", "Struct Field Order Test");
        outcome.push_entity(EntityReport {
            label: "ok".into(),
            layouts: None,
            savings: Ok(report(800, 300)),
        });
        outcome.push_entity(EntityReport {
            label: "busy".into(),
            layouts: None,
            savings: Err(SavingsError::Measurement(MeasureError::WindowBusy)),
        });

        assert_eq!(outcome.total_saved_bytes, 500);
        assert!(outcome.has_faults());
        let failures: Vec<_> = outcome.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "busy");
    }

    #[test]
    fn test_suspect_entity_does_not_change_total() {
        let mut outcome = TestOutcome::new("struct-multi", "Multiple Struct Types Test");
        outcome.push_entity(EntityReport {
            label: "API Request".into(),
            layouts: None,
            savings: Ok(report(1200, 800)),
        });
        let mut shrank = report(0, 1_000_000);
        shrank.suspect = true;
        outcome.push_entity(EntityReport {
            label: "Config".into(),
            layouts: None,
            savings: Ok(shrank),
        });

        assert_eq!(outcome.total_saved_bytes, 400);
        assert_eq!(outcome.total_baseline_bytes(), 1200);
        assert_eq!(outcome.excluded_from_total(), vec!["Config"]);
        assert_eq!(outcome.reports().len(), 2);
        assert!(outcome.has_faults());
    }

    #[test]
    fn test_stats_serialize_as_plain_values() {
        let mut outcome = TestOutcome::new("struct-small", "Struct Field Order Test");
        outcome.set_stat("OptimizedStructSize", 24i64);
        outcome.set_stat("MemorySavingPercent", 33.5);
        outcome.set_stat("Note", "approximate");

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["stats"]["OptimizedStructSize"], 24);
        assert_eq!(json["stats"]["MemorySavingPercent"], 33.5);
        assert_eq!(json["stats"]["Note"], "approximate");
    }

    #[test]
    fn test_stat_value_display() {
        assert_eq!(StatValue::Int(8).to_string(), "8");
        assert_eq!(StatValue::Float(1.0 / 3.0).to_string(), "0.33");
        assert_eq!(StatValue::from("x").to_string(), "x");
    }
}
