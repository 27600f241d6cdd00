use clap::{Parser, Subcommand};
use clap_complete::Shell;
use layout_delta::cmd;
use layout_delta::memory::TrackingAllocator;
use std::path::PathBuf;
use std::process;

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator::system();

/// Struct field ordering heap cost meter
///
/// layout-delta allocates large batches of structs in their original and
/// padding-minimizing field orders and reports how much heap the reordering
/// saves.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure optimized and baseline layouts
    Run {
        /// Tests to run, comma separated or repeated (default: all)
        #[arg(value_name = "TESTS")]
        tests: Vec<String>,

        /// Output format: stdout, html, json
        #[arg(short, long, default_value = "stdout")]
        format: String,

        /// Render charts after the summaries
        #[arg(long)]
        viz: bool,

        /// HTML report path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also export per-test pages with dated history into this directory
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,

        /// Multiply every object count (e.g. 0.1 for a quick run)
        #[arg(long)]
        scale: Option<f64>,
    },

    /// List available tests
    List,

    /// Show theoretical struct layouts without measuring
    Layout {
        /// Tests to inspect (default: all)
        #[arg(value_name = "TESTS")]
        tests: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    // Set console emoji mode based on CLI flag
    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match cli.command {
        Some(Commands::Run {
            tests,
            format,
            viz,
            output,
            export_dir,
            scale,
        }) => cmd::cmd_run(&cmd::RunOptions {
            tests,
            format,
            viz,
            output,
            export_dir,
            scale,
        }),
        Some(Commands::List) => cmd::cmd_list(),
        Some(Commands::Layout { tests }) => cmd::cmd_layout(&tests),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(shell);
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("layout-delta v{}", env!("CARGO_PKG_VERSION"));
            println!("Struct field ordering heap cost meter\n");
            println!("Usage: layout-delta <COMMAND>\n");
            println!("Commands:");
            println!("  run          Measure optimized and baseline layouts");
            println!("  list         List available tests");
            println!("  layout       Show theoretical struct layouts");
            println!("  completions  Generate shell completions");
            println!("\nRun 'layout-delta <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use layout_delta::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn test_run_accepts_repeated_and_comma_separated_tests() {
        let cli = Cli::try_parse_from([
            "layout-delta",
            "run",
            "struct-small,struct-big",
            "struct-multi",
            "--format",
            "json",
            "--scale",
            "0.01",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run {
                tests,
                format,
                scale,
                ..
            }) => {
                assert_eq!(tests, vec!["struct-small,struct-big", "struct-multi"]);
                assert_eq!(format, "json");
                assert_eq!(scale, Some(0.01));
            }
            _ => panic!("expected run"),
        }
    }
}
