//! Test fixture helpers for project directories

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Empty working directory; keep the `TempDir` alive for the test
pub fn empty_project() -> anyhow::Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Working directory with the given `.layout-delta.toml` contents
pub fn project_with_config(contents: &str) -> anyhow::Result<TempDir> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join(".layout-delta.toml"), contents)?;
    Ok(dir)
}

/// Working directory configured for fast runs with a fixed seed
pub fn quick_project() -> anyhow::Result<TempDir> {
    project_with_config(
        r#"
object-count = 2000
large-object-count = 500
seed = 7
"#,
    )
}

/// Read a report file below `dir`
pub fn read(dir: &Path, relative: &str) -> anyhow::Result<String> {
    Ok(fs::read_to_string(dir.join(relative))?)
}
