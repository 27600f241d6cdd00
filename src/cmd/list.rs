//! List command implementation

use anyhow::Result;
use console::style;
use std::env;
use std::fmt::Write;

use crate::config::ConfigLoader;
use crate::fmt::format_count;
use crate::suite::{registry, MemoryTest, RunSettings};

/// Print every registered test with its pairs and object counts
///
/// Counts reflect `.layout-delta.toml` when one is present.
pub fn cmd_list() -> Result<()> {
    let config = ConfigLoader::load(&env::current_dir()?)?;
    let settings = RunSettings::from_config(&config);
    print!("{}", render_list(&registry(), &settings));
    Ok(())
}

/// Listing text for `tests`
pub fn render_list(tests: &[Box<dyn MemoryTest>], settings: &RunSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style("Available tests:").bold());

    for test in tests {
        let _ = writeln!(out, "\n  {:<14} {}", style(test.key()).cyan(), test.name());
        for pair in test.pairs(settings) {
            let _ = writeln!(
                out,
                "  {:<14}   - {} ({} objects)",
                "",
                pair.label,
                format_count(pair.object_count)
            );
        }
    }

    out
}
