//! Completions command implementation
//!
//! Handles the `layout-delta completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap::{Arg, ArgAction, Command};
use clap_complete::{generate, Shell};
use std::io::Write;

use crate::report::OutputFormat;
use crate::suite::available_keys;

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// layout-delta completions bash > /etc/bash_completion.d/layout-delta
///
/// # Zsh
/// layout-delta completions zsh > ~/.zfunc/_layout-delta
///
/// # Fish
/// layout-delta completions fish > ~/.config/fish/completions/layout-delta.fish
/// ```
pub fn cmd_completions(shell: Shell) {
    write_completions(shell, &mut std::io::stdout());
}

/// Write the completion script for `shell` to `out`
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = completion_command();
    generate(shell, &mut cmd, "layout-delta", out);
}

// Cli lives in main.rs, so the command tree is rebuilt here. Test names and
// formats are offered as completion values.
fn completion_command() -> Command {
    let tests = || {
        Arg::new("tests")
            .value_name("TESTS")
            .num_args(0..)
            .value_parser(available_keys())
    };

    Command::new("layout-delta")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Measures the heap cost of struct field ordering")
        .arg(
            Arg::new("no-emoji")
                .long("no-emoji")
                .help("Disable emoji output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Measure optimized and baseline layouts")
                .arg(tests())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(OutputFormat::NAMES),
                )
                .arg(Arg::new("viz").long("viz").action(ArgAction::SetTrue))
                .arg(Arg::new("output").long("output").short('o'))
                .arg(Arg::new("export-dir").long("export-dir"))
                .arg(Arg::new("scale").long("scale")),
        )
        .subcommand(Command::new("list").about("List available tests"))
        .subcommand(
            Command::new("layout")
                .about("Show theoretical struct layouts")
                .arg(tests()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(Arg::new("shell").value_parser(clap::value_parser!(Shell))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_command_is_consistent() {
        completion_command().debug_assert();
    }

    #[test]
    fn test_completions_all_shells_generate_output() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut out = Vec::new();
            write_completions(shell, &mut out);
            let script = String::from_utf8(out).unwrap();
            assert!(script.contains("layout-delta"), "{:?} script is empty", shell);
        }
    }

    #[test]
    fn test_zsh_completions_offer_test_names_and_formats() {
        let mut out = Vec::new();
        write_completions(Shell::Zsh, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("struct-small"));
        assert!(script.contains("json"));
        assert!(script.contains("--export-dir"));
    }
}
