//! Terminal rendering of test outcomes

use console::style;
use std::fmt::Write;

use crate::fmt::{format_bytes, format_count, format_signed_bytes, icon, CHART, CROSSMARK, WARNING};
use crate::memory::{EntityReport, TestOutcome};

const LABEL_WIDTH: usize = 18;
const BAR_WIDTH: usize = 40;
const RULE_WIDTH: usize = 96;

/// Print the summary table of one test
pub fn print_summary(outcome: &TestOutcome) {
    print!("{}", summary(outcome));
}

/// Print the bar chart of every test
pub fn print_chart(outcomes: &[TestOutcome]) {
    print!("{}", chart(outcomes));
}

/// Summary table: one row per entity, then totals and layout notes
pub fn summary(outcome: &TestOutcome) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n{} {} {}",
        icon(CHART),
        style(&outcome.name).bold(),
        style(format!("({})", outcome.key)).dim()
    );
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$} {:>11} {:>12} {:>12} {:>12} {:>8} {:>12}",
        "Entity", "Objects", "Optimized", "Baseline", "Saved", "Saved %", "Per object"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for entity in &outcome.entities {
        let _ = writeln!(out, "{}", row(entity));
    }

    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "Total saved: {} ({:.2}%)",
        style(format_signed_bytes(outcome.total_saved_bytes)).green().bold(),
        outcome.total_saved_percent()
    );

    for entity in &outcome.entities {
        if let Some(layouts) = &entity.layouts {
            let count = entity.savings.as_ref().map(|r| r.object_count).ok();
            let mut note = format!(
                "  {}: {} vs {} per instance, {} padding",
                entity.label,
                format_bytes(layouts.optimized.size as u64),
                format_bytes(layouts.baseline.size as u64),
                format_signed_bytes(layouts.waste_per_instance())
            );
            if let Some(count) = count {
                let _ = write!(
                    note,
                    " ({} theoretical over {} objects)",
                    format_signed_bytes(layouts.total_waste(count)),
                    format_count(count)
                );
            }
            let _ = writeln!(out, "{}", style(note).dim());
        }
    }

    let excluded = outcome.excluded_from_total();
    if !excluded.is_empty() {
        let _ = writeln!(
            out,
            "{} heap shrank during a marked measurement; its figures are unreliable",
            icon(WARNING)
        );
        let _ = writeln!(
            out,
            "{}",
            style(format!("  Excluded from total: {}", excluded.join(", "))).yellow()
        );
    }

    out
}

fn row(entity: &EntityReport) -> String {
    let label = truncate(&entity.label, LABEL_WIDTH);
    match &entity.savings {
        Ok(report) => {
            let line = format!(
                "{:<LABEL_WIDTH$} {:>11} {:>12} {:>12} {:>12} {:>7.2}% {:>10.2} B",
                label,
                format_count(report.object_count),
                format_bytes(report.optimized_bytes),
                format_bytes(report.baseline_bytes),
                format_signed_bytes(report.saved_bytes),
                report.saved_percent,
                report.per_object_saved_bytes
            );
            if report.suspect {
                format!("{} {}", style(line).yellow(), icon(WARNING))
            } else {
                line
            }
        }
        Err(e) => format!(
            "{:<LABEL_WIDTH$} {} {}",
            label,
            icon(CROSSMARK),
            style(format!("not measured: {}", e)).red()
        ),
    }
}

/// Bar chart of optimized and baseline bytes, scaled per test
pub fn chart(outcomes: &[TestOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Memory Usage Visualization ===");

    for outcome in outcomes {
        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        let _ = writeln!(out, "{}", style(&outcome.name).bold());

        let reports: Vec<_> = outcome
            .entities
            .iter()
            .filter_map(|e| e.savings.as_ref().ok().map(|r| (e.label.as_str(), r)))
            .collect();
        let max = reports
            .iter()
            .map(|(_, r)| r.optimized_bytes.max(r.baseline_bytes))
            .max()
            .unwrap_or(0);

        if reports.is_empty() {
            let _ = writeln!(out, "  no measurements");
            continue;
        }

        for (label, report) in reports {
            let _ = writeln!(out, "--- {} ---", label);
            let _ = writeln!(
                out,
                "{:<12} {:>12} {}",
                "Optimized",
                format_bytes(report.optimized_bytes),
                style(bar(report.optimized_bytes, max)).cyan()
            );
            let _ = writeln!(
                out,
                "{:<12} {:>12} {}",
                "Unoptimized",
                format_bytes(report.baseline_bytes),
                style(bar(report.baseline_bytes, max)).red()
            );
            let _ = writeln!(out, "Memory Saving: {:.2}%", report.saved_percent);
        }
    }

    out
}

fn bar(value: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (value as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(width - 1).collect();
        short.push('…');
        short
    }
}
