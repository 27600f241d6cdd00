//! Configuration for layout-delta
//!
//! An optional `.layout-delta.toml` in the working directory sets object
//! counts, the count multiplier, the rng seed and report locations. Command
//! line flags take precedence over file values.

pub mod file;
pub mod loader;

pub use file::{ConfigFile, ReportSettings, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
