//! Result rendering
//!
//! Outcomes can be rendered three ways:
//! - [`OutputFormat::Stdout`]: a summary table per test, plus a bar chart
//!   with `--viz`
//! - [`OutputFormat::Html`]: a Chart.js page, optionally exported as a
//!   browsable directory with dated history
//! - [`OutputFormat::Json`]: every [`TestOutcome`] serialized on stdout

pub mod html;
pub mod json;
pub mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::config::file::DEFAULT_REPORT_FILE;
use crate::error::LayoutDeltaError;
use crate::infra::FileSystem;
use crate::memory::TestOutcome;

/// Report format selected with `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain terminal output
    #[default]
    Stdout,
    /// HTML page with charts
    Html,
    /// Machine readable JSON
    Json,
}

impl OutputFormat {
    /// Names accepted by [`OutputFormat::from_str`]
    pub const NAMES: [&'static str; 3] = ["stdout", "html", "json"];
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Stdout => "stdout",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = LayoutDeltaError;

    /// Parse a format name, ignoring case; `terminal` is accepted for stdout
    ///
    /// ```
    /// use layout_delta::report::OutputFormat;
    ///
    /// assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
    /// assert!("png".parse::<OutputFormat>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" | "terminal" => Ok(OutputFormat::Stdout),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            _ => Err(LayoutDeltaError::InvalidFormat {
                format: s.to_string(),
                valid_formats: Self::NAMES.iter().map(|n| n.to_string()).collect(),
            }),
        }
    }
}

/// Where and how much to render
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Render the chart view after the summaries
    pub viz: bool,
    /// HTML report path
    pub output: PathBuf,
    /// Directory receiving per-test pages and dated history
    pub export_dir: Option<PathBuf>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            viz: false,
            output: PathBuf::from(DEFAULT_REPORT_FILE),
            export_dir: None,
        }
    }
}

/// Render `outcomes` in `format`
///
/// # Errors
///
/// [`LayoutDeltaError::Io`] when a report file cannot be written, or a
/// serialization error for JSON output.
pub fn render<FS: FileSystem>(
    format: OutputFormat,
    outcomes: &[TestOutcome],
    options: &ReportOptions,
    fs: &FS,
) -> Result<()> {
    match format {
        OutputFormat::Stdout => {
            for outcome in outcomes {
                terminal::print_summary(outcome);
            }
            if options.viz {
                terminal::print_chart(outcomes);
            }
        }
        OutputFormat::Html => {
            // the page always carries its charts, so --viz adds nothing here
            let generated_at = chrono::Local::now().naive_local();
            html::write_report(outcomes, &options.output, &generated_at, fs)
                .context("Failed to write HTML report")?;
            println!(
                "{} HTML report saved to {}",
                crate::fmt::icon(crate::fmt::CHART),
                options.output.display()
            );

            if let Some(dir) = &options.export_dir {
                let index = html::export(outcomes, dir, &generated_at, fs)
                    .context("Failed to export HTML pages")?;
                println!(
                    "{} Results exported, index at {}",
                    crate::fmt::icon(crate::fmt::SPARKLES),
                    index.display()
                );
            }
        }
        OutputFormat::Json => {
            let rendered = json::render(outcomes).context("Failed to serialize results")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parses_known_names() {
        assert_eq!("stdout".parse::<OutputFormat>().unwrap(), OutputFormat::Stdout);
        assert_eq!("terminal".parse::<OutputFormat>().unwrap(), OutputFormat::Stdout);
        assert_eq!(" Json ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
    }

    #[test]
    fn test_output_format_rejects_unknown_with_usage_error() {
        let err = "pdf".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.exit_code(), 64);
        match err {
            LayoutDeltaError::InvalidFormat {
                format,
                valid_formats,
            } => {
                assert_eq!(format, "pdf");
                assert_eq!(valid_formats, vec!["stdout", "html", "json"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_output_format_display_round_trips() {
        for name in OutputFormat::NAMES {
            let format: OutputFormat = name.parse().unwrap();
            assert_eq!(format.to_string(), name);
        }
    }

    #[test]
    fn test_default_options_write_default_report_file() {
        let options = ReportOptions::default();
        assert!(!options.viz);
        assert_eq!(options.output, PathBuf::from("memory_test_results.html"));
        assert!(options.export_dir.is_none());
    }

    #[test]
    fn test_render_html_writes_output_file() {
        let temp = tempfile::tempdir().unwrap();
        let options = ReportOptions {
            output: temp.path().join("report.html"),
            ..Default::default()
        };
        let outcome = TestOutcome::new("struct-small", "Struct Field Order Test");

        render(
            OutputFormat::Html,
            &[outcome],
            &options,
            &crate::infra::RealFileSystem,
        )
        .unwrap();

        let page = std::fs::read_to_string(temp.path().join("report.html")).unwrap();
        assert!(page.contains("Struct Field Order Test"));
    }
}
