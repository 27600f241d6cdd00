//! Enhanced error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes
//! - Documentation pointers
//! - sysexits-style exit codes
//!
//! Measurement faults (a heap that shrank during a workload) are not errors;
//! they travel on the results and never change the exit status.
//!
//! # Examples
//!
//! ```
//! use layout_delta::error::LayoutDeltaError;
//!
//! let err = LayoutDeltaError::UnknownTest {
//!     name: "struct-huge".to_string(),
//!     available: vec!["struct-small".to_string(), "struct-big".to_string()],
//! };
//!
//! assert_eq!(err.exit_code(), 64);
//! assert!(err.suggestion().unwrap().contains("struct-small"));
//! ```

use thiserror::Error;

use crate::memory::MeasureError;

/// layout-delta errors with contextual suggestions
#[derive(Error, Debug)]
pub enum LayoutDeltaError {
    /// No test is registered under the requested name
    #[error("Test '{name}' not found")]
    UnknownTest {
        /// Requested name
        name: String,
        /// Registered test keys
        available: Vec<String>,
    },

    /// Unknown report format
    #[error("Unknown output format: '{format}'")]
    InvalidFormat {
        /// Requested format
        format: String,
        /// Supported formats
        valid_formats: Vec<String>,
    },

    /// The measurement environment is unusable
    #[error(transparent)]
    Measurement(#[from] MeasureError),

    /// I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// What was being done
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Configuration values that cannot be used
    #[error("Invalid configuration: {reason}")]
    ConfigInvalid {
        /// What is wrong
        reason: String,
    },
}

impl LayoutDeltaError {
    /// Get actionable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnknownTest { available, .. } => Some(format!(
                "Available tests: {}\nRun 'layout-delta list' to see all tests",
                available.join(", ")
            )),
            Self::InvalidFormat { valid_formats, .. } => {
                Some(format!("Valid formats: {}", valid_formats.join(", ")))
            }
            Self::Measurement(MeasureError::HeapStatsUnavailable) => Some(
                "Install the tracking allocator in the binary:\n  \
                 #[global_allocator] static A: TrackingAllocator = TrackingAllocator::system();"
                    .to_string(),
            ),
            Self::Measurement(MeasureError::WindowBusy) => Some(
                "Only one measurement may run at a time; run tests sequentially".to_string(),
            ),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
            Self::ConfigInvalid { .. } => {
                Some("Fix the value in .layout-delta.toml or override it on the command line".to_string())
            }
        }
    }

    /// Get documentation pointer for this error.
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::ConfigInvalid { .. } => Some("README.md#configuration"),
            Self::Measurement(_) => Some("README.md#how-measurement-works"),
            _ => None,
        }
    }

    /// Get appropriate exit code for this error (sysexits.h conventions).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownTest { .. } => 64,   // EX_USAGE
            Self::InvalidFormat { .. } => 64, // EX_USAGE
            Self::Measurement(_) => 70,       // EX_SOFTWARE
            Self::Io { .. } => 74,            // EX_IOERR
            Self::ConfigInvalid { .. } => 78, // EX_CONFIG
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions and documentation links
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(ld_error) = Self::find(error) {
            if let Some(suggestion) = ld_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }

            if let Some(docs) = ld_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(ld_error) = Self::find(error) {
            ld_error.exit_code()
        } else if error.downcast_ref::<MeasureError>().is_some() {
            70
        } else {
            1
        }
    }

    fn find(error: &anyhow::Error) -> Option<&LayoutDeltaError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<LayoutDeltaError>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_unknown_test_lists_alternatives() {
        let err = LayoutDeltaError::UnknownTest {
            name: "foo".to_string(),
            available: vec![
                "struct-small".to_string(),
                "struct-big".to_string(),
                "struct-multi".to_string(),
            ],
        };

        let suggestion = err.suggestion().expect("UnknownTest should have suggestion");
        assert!(suggestion.contains("struct-small"));
        assert!(suggestion.contains("struct-multi"));
        assert!(suggestion.contains("layout-delta list"));
    }

    #[test]
    fn test_exit_codes_follow_conventions() {
        let usage = LayoutDeltaError::UnknownTest {
            name: "x".to_string(),
            available: vec![],
        };
        assert_eq!(usage.exit_code(), 64);

        let env = LayoutDeltaError::Measurement(MeasureError::HeapStatsUnavailable);
        assert_eq!(env.exit_code(), 70);

        let io = LayoutDeltaError::Io {
            context: "writing report".to_string(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(io.exit_code(), 74);
    }

    #[test]
    fn test_heap_stats_unavailable_explains_allocator_install() {
        let err = LayoutDeltaError::from(MeasureError::HeapStatsUnavailable);
        let suggestion = err.suggestion().unwrap();
        assert!(suggestion.contains("global_allocator"));
        assert!(err.docs_url().is_some());
    }

    #[test]
    fn test_formatter_finds_error_behind_context() {
        let err: anyhow::Result<()> = Err(LayoutDeltaError::Io {
            context: "memory_test_results.html".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
        .context("Failed to write HTML report");
        let err = err.unwrap_err();

        assert_eq!(ErrorFormatter::exit_code(&err), 74);
        let rendered = ErrorFormatter::format(&err);
        assert!(rendered.contains("Failed to write HTML report"));
        assert!(rendered.contains("caused by:"));
        assert!(rendered.contains("permissions"));
    }

    #[test]
    fn test_formatter_maps_bare_measure_error() {
        let err = anyhow::Error::new(MeasureError::WindowBusy);
        assert_eq!(ErrorFormatter::exit_code(&err), 70);
    }

    #[test]
    fn test_formatter_prints_measurement_error_once() {
        let err = anyhow::Error::new(LayoutDeltaError::from(MeasureError::HeapStatsUnavailable));
        let rendered = ErrorFormatter::format(&err);

        assert_eq!(rendered.matches("heap statistics unavailable").count(), 1);
        assert!(!rendered.contains("caused by:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 70);
    }

    #[test]
    fn test_formatter_generic_error_exit_code() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
        assert!(ErrorFormatter::format(&err).contains("something else"));
    }

    #[test]
    fn test_all_error_variants_have_suggestions() {
        let errors = vec![
            LayoutDeltaError::UnknownTest {
                name: "x".to_string(),
                available: vec!["struct-small".to_string()],
            },
            LayoutDeltaError::InvalidFormat {
                format: "png".to_string(),
                valid_formats: vec!["stdout".to_string()],
            },
            LayoutDeltaError::Measurement(MeasureError::WindowBusy),
            LayoutDeltaError::Io {
                context: "x".to_string(),
                source: std::io::Error::other("x"),
            },
            LayoutDeltaError::ConfigInvalid {
                reason: "scale".to_string(),
            },
        ];

        for err in errors {
            assert!(err.suggestion().is_some(), "{:?} should have a suggestion", err);
            assert!(err.exit_code() > 0 && err.exit_code() < 256);
        }
    }
}
