//! Layout command implementation
//!
//! Handles `layout-delta layout`, the static half of the analysis: struct
//! sizes, field offsets and padding gaps. Nothing is allocated or measured.

use anyhow::{Context, Result};
use console::style;
use std::env;
use std::fmt::Write;

use crate::config::ConfigLoader;
use crate::fmt::{format_count, format_signed_bytes, icon, MICROSCOPE};
use crate::memory::{LayoutComparison, LayoutDescriptor};
use crate::suite::{self, MemoryTest, RunSettings};

use super::run::split_names;

/// Print the theoretical layout analysis of the selected tests
///
/// Object counts come from `.layout-delta.toml` when one is present, the
/// same way `run` resolves them.
///
/// # Examples
///
/// ```no_run
/// use layout_delta::cmd::layout::cmd_layout;
///
/// cmd_layout(&["struct-big".to_string()])?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// [`LayoutDeltaError::UnknownTest`](crate::error::LayoutDeltaError::UnknownTest)
/// for a name that matches no test.
pub fn cmd_layout(names: &[String]) -> Result<()> {
    let tests = suite::select(&split_names(names))?;
    let project_root = env::current_dir().context("Failed to read current directory")?;
    let config = ConfigLoader::load(&project_root)?;
    print!("{}", render_layouts(&tests, &RunSettings::from_config(&config)));
    Ok(())
}

/// Layout analysis text for `tests`
pub fn render_layouts(tests: &[Box<dyn MemoryTest>], settings: &RunSettings) -> String {
    let mut out = String::new();

    for test in tests {
        let _ = writeln!(
            out,
            "\n{} {} {}",
            icon(MICROSCOPE),
            style(test.name()).bold(),
            style(format!("({})", test.key())).dim()
        );

        for pair in test.pairs(settings) {
            let Some(layouts) = &pair.layouts else {
                continue;
            };
            let _ = writeln!(out, "\n  {}", style(&pair.label).underlined());
            describe(&mut out, "optimized", &layouts.optimized);
            describe(&mut out, "baseline", &layouts.baseline);
            summarize(&mut out, layouts, pair.object_count);
        }
    }

    out
}

fn describe(out: &mut String, role: &str, layout: &LayoutDescriptor) {
    let _ = writeln!(
        out,
        "    {} {}: {} bytes, align {}, {} fields, {} padding bytes",
        role,
        layout.type_name,
        layout.size,
        layout.align,
        layout.fields.len(),
        layout.padding_bytes()
    );
    for field in layout.fields_by_offset() {
        let _ = writeln!(
            out,
            "      {:>5}  {:<24} {:>4} B",
            field.offset, field.name, field.size
        );
    }
    for (offset, len) in layout.gaps() {
        let _ = writeln!(
            out,
            "      {:>5}  {} {:>4} B",
            offset,
            style(format!("{:<24}", "<padding>")).yellow(),
            len
        );
    }
}

fn summarize(out: &mut String, layouts: &LayoutComparison, object_count: usize) {
    let _ = writeln!(
        out,
        "    waste: {} per instance, {} over {} objects",
        format_signed_bytes(layouts.waste_per_instance()),
        format_signed_bytes(layouts.total_waste(object_count)),
        format_count(object_count)
    );
}
