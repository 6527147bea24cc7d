//! Tracknet CLI - Command-line interface for model-railroad layout analysis.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracknet")]
#[command(author, version, about = "Track topology and route analysis for modular layouts", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a layout description without building it
    Validate(commands::validate::ValidateArgs),

    /// Build a layout and show what it contains
    Info(commands::info::InfoArgs),

    /// Enumerate all routes from every rail node, or from one node
    Paths(commands::paths::PathsArgs),

    /// Find the routes between two nodes
    Route(commands::route::RouteArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Paths(args) => commands::paths::run(args),
        Commands::Route(args) => commands::route::run(args),
    }
}
