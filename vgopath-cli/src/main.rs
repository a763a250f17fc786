//! vgopath CLI - materialize a virtual GOPATH for a Go module workspace.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::config::ConfigCommands;
use commands::link::LinkArgs;
use commands::modules::ModulesArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "vgopath", version, about = "Build a virtual GOPATH from the Go module graph")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or refresh the virtual GOPATH
    Link {
        /// Destination directory of the virtual GOPATH
        #[arg(short, long)]
        output: PathBuf,

        /// Directory to resolve modules in (default: current directory)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// go binary to run (default: config file, then `go` on PATH)
        #[arg(long)]
        go: Option<PathBuf>,

        /// Do not link the go binary directory to <output>/bin
        #[arg(long)]
        skip_bin: bool,

        /// Do not link the go build cache to <output>/cache
        #[arg(long)]
        skip_build_cache: bool,

        /// Do not link modules under <output>/src
        #[arg(long)]
        skip_modules: bool,
    },

    /// List the modules the resolver reports
    Modules {
        /// Directory to resolve modules in (default: current directory)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// go binary to run
        #[arg(long)]
        go: Option<PathBuf>,

        /// Include modules without a directory
        #[arg(long)]
        all: bool,
    },

    /// Inspect the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}

/// The one line printed for a failed command.
fn error_line(e: &CliError) -> String {
    format!("Error: {}", e)
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Link {
            output,
            source,
            go,
            skip_bin,
            skip_build_cache,
            skip_modules,
        } => commands::link::run(LinkArgs {
            output,
            source,
            go,
            skip_bin,
            skip_build_cache,
            skip_modules,
        }),
        Commands::Modules { source, go, all } => {
            commands::modules::run(ModulesArgs { source, go, all })
        }
        Commands::Config(command) => commands::config::run(command),
    }
}

/// Install the stderr logger. `RUST_LOG` overrides the default filter.
fn setup_logging(verbose: bool) -> Result<(), CliError> {
    let default = if verbose {
        "vgopath=debug,warn"
    } else {
        "vgopath=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
