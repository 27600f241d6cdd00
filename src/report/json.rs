//! JSON output for scripting and CI

use serde::{Deserialize, Serialize};

use crate::memory::{accumulate, TestOutcome};

/// Top-level JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// layout-delta version that produced the document
    pub version: String,
    /// Saved bytes summed over every trusted entity of every test
    pub total_saved_bytes: i64,
    /// `test-key/entity` for each faulted entity left out of the total
    pub excluded_from_total: Vec<String>,
    /// Whether any entity failed or is suspect
    pub has_faults: bool,
    /// Test outcomes in run order
    pub tests: Vec<TestOutcome>,
}

impl JsonReport {
    /// Document for `outcomes`
    pub fn new(outcomes: &[TestOutcome]) -> Self {
        let reports: Vec<_> = outcomes.iter().flat_map(|o| o.trusted_reports()).collect();
        let excluded = outcomes
            .iter()
            .flat_map(|o| {
                o.excluded_from_total()
                    .into_iter()
                    .map(move |label| format!("{}/{}", o.key, label))
            })
            .collect();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            total_saved_bytes: accumulate(&reports),
            excluded_from_total: excluded,
            has_faults: outcomes.iter().any(TestOutcome::has_faults),
            tests: outcomes.to_vec(),
        }
    }
}

/// Pretty-printed JSON document for `outcomes`
pub fn render(outcomes: &[TestOutcome]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{EntityReport, MeasureError, SavingsError, SavingsReport};

    fn outcome(key: &str, saved: i64) -> TestOutcome {
        let mut outcome = TestOutcome::new(key, key);
        outcome.push_entity(entity("pair", saved, false));
        outcome
    }

    fn entity(label: &str, saved: i64, suspect: bool) -> EntityReport {
        EntityReport {
            label: label.into(),
            layouts: None,
            savings: Ok(SavingsReport {
                object_count: 10,
                optimized_bytes: 1_000,
                baseline_bytes: (1_000 + saved) as u64,
                saved_bytes: saved,
                saved_percent: 0.0,
                per_object_saved_bytes: saved as f64 / 10.0,
                suspect,
            }),
        }
    }

    #[test]
    fn test_render_totals_across_tests() {
        let json = render(&[outcome("a", 500), outcome("b", 1_500)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_saved_bytes"], 2_000);
        assert_eq!(value["has_faults"], false);
        assert_eq!(value["tests"].as_array().unwrap().len(), 2);
        assert_eq!(value["tests"][0]["entities"][0]["savings"]["Ok"]["saved_bytes"], 500);
    }

    #[test]
    fn test_render_leaves_suspect_entities_out_of_total() {
        let mut mixed = outcome("struct-multi", 300);
        mixed.push_entity(entity("Config", -1_000, true));

        let json = render(&[mixed, outcome("struct-small", 200)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_saved_bytes"], 500);
        assert_eq!(value["has_faults"], true);
        assert_eq!(value["excluded_from_total"][0], "struct-multi/Config");
        assert_eq!(value["tests"][0]["total_saved_bytes"], 300);
    }

    #[test]
    fn test_render_keeps_failures() {
        let mut failed = TestOutcome::new("c", "c");
        failed.push_entity(EntityReport {
            label: "busy".into(),
            layouts: None,
            savings: Err(SavingsError::Measurement(MeasureError::WindowBusy)),
        });

        let json = render(&[failed]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["has_faults"], true);
        assert!(value["tests"][0]["entities"][0]["savings"].get("Err").is_some());
    }

    #[test]
    fn test_render_round_trips_document() {
        let json = render(&[outcome("a", 16)]).unwrap();
        let report: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report.tests[0].key, "a");
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    }
}
