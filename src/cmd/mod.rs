//! Command handlers for layout-delta CLI
//!
//! This module contains all command implementations, organized by functionality.
//! Each submodule handles a specific CLI command.

pub mod completions;
pub mod layout;
pub mod list;
pub mod run;

// Re-export command functions for convenient access
pub use completions::cmd_completions;
pub use layout::cmd_layout;
pub use list::cmd_list;
pub use run::{cmd_run, RunOptions};
