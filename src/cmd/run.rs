//! Run command implementation
//!
//! Handles `layout-delta run`: loads configuration, measures the selected
//! tests and renders their outcomes.

use anyhow::{Context, Result};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::PathBuf;

use crate::config::ConfigLoader;
use crate::error::LayoutDeltaError;
use crate::fmt::{icon, CROSSMARK, ROCKET, SPARKLES, WARNING};
use crate::infra::RealFileSystem;
use crate::memory::{sampler::ensure_available, TestOutcome, TrackingSampler};
use crate::report::{self, OutputFormat, ReportOptions};
use crate::suite::{self, MemoryTest, RunContext, RunSettings};

/// Options of `layout-delta run`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Test keys; each entry may hold several comma separated keys
    pub tests: Vec<String>,
    /// Output format name
    pub format: String,
    /// Render charts after the summaries
    pub viz: bool,
    /// HTML report path, overriding the configuration
    pub output: Option<PathBuf>,
    /// Report site directory, overriding the configuration
    pub export_dir: Option<PathBuf>,
    /// Count multiplier, overriding the configuration
    pub scale: Option<f64>,
}

/// Measure the selected tests and render the results
///
/// Measurement faults are reported with the results and never fail the
/// command.
///
/// # Examples
///
/// ```no_run
/// use layout_delta::cmd::run::{cmd_run, RunOptions};
///
/// cmd_run(&RunOptions {
///     tests: vec!["struct-small".to_string()],
///     format: "stdout".to_string(),
///     scale: Some(0.01),
///     ..Default::default()
/// })?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - A test name or the output format is unknown
/// - The configuration or `--scale` is invalid
/// - The tracking allocator is not installed
/// - A report file cannot be written
pub fn cmd_run(options: &RunOptions) -> Result<()> {
    let format: OutputFormat = options.format.parse()?;
    let tests = suite::select(&split_names(&options.tests))?;

    let project_root = env::current_dir().context("Failed to read current directory")?;
    let config = ConfigLoader::load(&project_root)?;

    let mut settings = RunSettings::from_config(&config);
    if let Some(scale) = options.scale {
        validate_scale(scale)?;
        settings = settings.with_scale(scale);
    }

    let sampler = TrackingSampler;
    ensure_available(&sampler).map_err(LayoutDeltaError::from)?;

    let quiet = format == OutputFormat::Json;
    if !quiet {
        println!(
            "{} {} {} test(s), seed {}",
            icon(ROCKET),
            style("layout-delta").bold(),
            tests.len(),
            settings.seed
        );
    }

    let progress = progress_bar(&tests, &settings, quiet);
    let ctx = RunContext::new(&sampler, settings.seed).with_progress(progress);
    let outcomes = run_all(&tests, &settings, &ctx);
    ctx.progress().finish_and_clear();

    let report_options = ReportOptions {
        viz: options.viz,
        output: options
            .output
            .clone()
            .or_else(|| config.report_output().map(PathBuf::from))
            .unwrap_or_else(|| ReportOptions::default().output),
        export_dir: options
            .export_dir
            .clone()
            .or_else(|| config.export_dir().map(PathBuf::from)),
    };
    report::render(format, &outcomes, &report_options, &RealFileSystem)?;

    if !quiet {
        print_fault_summary(&outcomes);
    }

    Ok(())
}

/// Run every test in order through one context
pub fn run_all(
    tests: &[Box<dyn MemoryTest>],
    settings: &RunSettings,
    ctx: &RunContext<'_>,
) -> Vec<TestOutcome> {
    tests
        .iter()
        .map(|test| {
            log::info!("running {} ({})", test.name(), test.key());
            test.run(settings, ctx)
        })
        .collect()
}

/// Flatten `a,b` style arguments into single names
pub fn split_names(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_scale(scale: f64) -> Result<(), LayoutDeltaError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(LayoutDeltaError::ConfigInvalid {
            reason: format!("--scale must be a positive number, got {}", scale),
        })
    }
}

// No steady tick: a ticker thread would allocate while a window samples.
fn progress_bar(tests: &[Box<dyn MemoryTest>], settings: &RunSettings, quiet: bool) -> ProgressBar {
    if quiet || !Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let total: usize = tests.iter().map(|t| t.pairs(settings).len()).sum();
    let bar = ProgressBar::new(total as u64);
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}") {
        bar.set_style(template);
    }
    bar
}

fn print_fault_summary(outcomes: &[TestOutcome]) {
    let mut clean = true;
    for outcome in outcomes {
        for (label, err) in outcome.failures() {
            clean = false;
            println!(
                "{} {} / {}: {}",
                icon(CROSSMARK),
                outcome.name,
                label,
                style(err).red()
            );
        }
        for entity in outcome.entities.iter().filter(|e| e.is_suspect()) {
            clean = false;
            println!(
                "{} {} / {}: heap shrank during measurement",
                icon(WARNING),
                outcome.name,
                entity.label
            );
        }
    }

    if clean {
        println!("\n{} All measurements completed", icon(SPARKLES));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::test_lock;
    use crate::memory::ScriptedSampler;

    #[test]
    fn test_split_names_accepts_commas_and_repeats() {
        let args = vec![
            "struct-small,struct-big".to_string(),
            " struct-multi ".to_string(),
            ",".to_string(),
        ];
        assert_eq!(
            split_names(&args),
            vec!["struct-small", "struct-big", "struct-multi"]
        );
    }

    #[test]
    fn test_validate_scale() {
        assert!(validate_scale(0.5).is_ok());
        assert_eq!(validate_scale(0.0).unwrap_err().exit_code(), 78);
        assert!(validate_scale(f64::INFINITY).is_err());
    }

    #[test]
    fn test_unknown_format_is_usage_error() {
        let err = cmd_run(&RunOptions {
            format: "yaml".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(crate::error::ErrorFormatter::exit_code(&err), 64);
    }

    #[test]
    fn test_unknown_test_is_usage_error() {
        let err = cmd_run(&RunOptions {
            tests: vec!["struct-small,struct-huge".to_string()],
            format: "json".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(crate::error::ErrorFormatter::exit_code(&err), 64);
        assert!(err.to_string().contains("struct-huge"));
    }

    #[test]
    fn test_run_all_keeps_test_order() {
        let _guard = test_lock();
        let sampler = ScriptedSampler::new([0]);
        let ctx = RunContext::new(&sampler, 3);
        let mut settings = RunSettings::default().with_scale(0.0);
        settings.seed = 3;

        let tests = suite::select(&[]).unwrap();
        let outcomes = run_all(&tests, &settings, &ctx);

        let keys: Vec<_> = outcomes.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["struct-small", "struct-big", "struct-multi"]);
        assert!(outcomes
            .iter()
            .flat_map(|o| o.entities.iter())
            .all(|e| e.savings.as_ref().is_ok_and(|r| r.object_count == 0)));
    }
}
