//! RV CLI - Markdown slide decks.
//!
//! Provides commands for:
//! - `serve`: Start the deck server
//! - `build`: Normalize a deck's text
//! - `export`: Write a standalone presentation page

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ExportArgs, ServeArgs};
use output::Output;

/// RV - Markdown slide decks.
#[derive(Parser)]
#[command(name = "rv", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the deck server.
    Serve(ServeArgs),
    /// Parse a deck and write it back normalized.
    Build(BuildArgs),
    /// Export a deck as a standalone HTML page.
    Export(ExportArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(args.execute()),
            Err(e) => Err(e.into()),
        },
        Commands::Build(args) => args.execute(&output),
        Commands::Export(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
