//! Configuration file data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LayoutDeltaError;
use crate::suite::entity_labels;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".layout-delta.toml";

/// Default object count for high-volume pairs
pub const DEFAULT_OBJECT_COUNT: usize = 1_000_000;

/// Default object count for the wide-struct family
pub const DEFAULT_LARGE_OBJECT_COUNT: usize = 100_000;

/// Default HTML report path
pub const DEFAULT_REPORT_FILE: &str = "memory_test_results.html";

/// layout-delta configuration file structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Object count for `struct-small` and the high-volume `struct-multi` pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_count: Option<usize>,

    /// Object count for `struct-big`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_object_count: Option<usize>,

    /// Multiplier applied to every object count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,

    /// Seed for populating workloads; time based when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Object count overrides keyed by entity label
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entities: BTreeMap<String, usize>,

    /// Report output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportSettings>,
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportSettings {
    /// HTML report path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Directory receiving the exported report site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
}

impl ConfigFile {
    /// Object count for high-volume pairs
    pub fn object_count(&self) -> usize {
        self.object_count.unwrap_or(DEFAULT_OBJECT_COUNT)
    }

    /// Object count for the wide-struct family
    pub fn large_object_count(&self) -> usize {
        self.large_object_count.unwrap_or(DEFAULT_LARGE_OBJECT_COUNT)
    }

    /// Count multiplier
    pub fn scale(&self) -> f64 {
        self.scale.unwrap_or(1.0)
    }

    /// HTML report path
    pub fn report_output(&self) -> Option<&str> {
        self.report.as_ref().and_then(|r| r.output.as_deref())
    }

    /// Report site directory
    pub fn export_dir(&self) -> Option<&str> {
        self.report.as_ref().and_then(|r| r.export_dir.as_deref())
    }

    /// Validate count and scale settings
    ///
    /// Rejects zero counts, a scale that is not a positive finite number and
    /// `[entities]` keys that name no built-in pair.
    pub fn validate(&self) -> Result<(), LayoutDeltaError> {
        if let Some(scale) = self.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(invalid(format!("scale must be a positive number, got {}", scale)));
            }
        }

        if self.object_count == Some(0) {
            return Err(invalid("object-count must be greater than zero".to_string()));
        }

        if self.large_object_count == Some(0) {
            return Err(invalid("large-object-count must be greater than zero".to_string()));
        }

        if let Some((label, _)) = self.entities.iter().find(|(_, count)| **count == 0) {
            return Err(invalid(format!(
                "object count for entity '{}' must be greater than zero",
                label
            )));
        }

        if !self.entities.is_empty() {
            let known = entity_labels();
            if let Some(label) = self.entities.keys().find(|l| !known.contains(l)) {
                return Err(invalid(format!(
                    "unknown entity '{}' in [entities]; known entities: {}",
                    label,
                    known.join(", ")
                )));
            }
        }

        Ok(())
    }
}

fn invalid(reason: String) -> LayoutDeltaError {
    LayoutDeltaError::ConfigInvalid { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_default_uses_reference_counts() {
        let config = ConfigFile::default();
        assert_eq!(config.object_count(), 1_000_000);
        assert_eq!(config.large_object_count(), 100_000);
        assert_eq!(config.scale(), 1.0);
        assert!(config.report_output().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_parses_kebab_case_keys() {
        let toml = r#"
object-count = 5000
large-object-count = 500
scale = 0.5
seed = 42

[entities]
"Config" = 100

[report]
output = "out.html"
export-dir = "docs"
"#;
        let config: ConfigFile = toml_edit::de::from_str(toml).unwrap();

        assert_eq!(config.object_count(), 5000);
        assert_eq!(config.large_object_count(), 500);
        assert_eq!(config.scale(), 0.5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.entities.get("Config"), Some(&100));
        assert_eq!(config.report_output(), Some("out.html"));
        assert_eq!(config.export_dir(), Some("docs"));
    }

    #[test]
    fn test_validate_rejects_non_positive_scale() {
        for scale in [0.0, -1.0, f64::NAN] {
            let config = ConfigFile {
                scale: Some(scale),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "scale {} should be rejected", scale);
        }
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let config = ConfigFile {
            object_count: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().exit_code(), 78);

        let mut entities = BTreeMap::new();
        entities.insert("GraphQL".to_string(), 0);
        let config = ConfigFile {
            entities,
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("GraphQL"));
    }

    #[test]
    fn test_validate_rejects_unknown_entity_label() {
        let mut entities = BTreeMap::new();
        entities.insert("Config".to_string(), 5);
        entities.insert("Confg".to_string(), 5);
        let config = ConfigFile {
            entities,
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert_eq!(err.exit_code(), 78);
        let message = err.to_string();
        assert!(message.contains("Confg"), "{}", message);
        assert!(message.contains("Database Entity"), "{}", message);
    }

    #[test]
    fn test_validate_accepts_known_entity_labels() {
        let mut entities = BTreeMap::new();
        entities.insert("Small Struct".to_string(), 10);
        entities.insert("GraphQL".to_string(), 10);
        let config = ConfigFile {
            entities,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_serializes_to_empty_document() {
        let rendered = toml_edit::ser::to_string_pretty(&ConfigFile::default()).unwrap();
        assert!(rendered.trim().is_empty());
    }
}
