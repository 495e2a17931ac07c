//! Quill CLI - markdown renderer.
//!
//! Provides commands for:
//! - `render`: Render a markdown document to an HTML fragment or page
//! - `copy-script`: Print the copy-code script pages embed once
//! - `languages`: List languages with syntax highlighting

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CopyScriptArgs, RenderArgs};
use output::Output;

/// Quill - markdown renderer.
#[derive(Parser)]
#[command(name = "quill", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to HTML.
    Render(RenderArgs),
    /// Print the copy-code script.
    CopyScript(CopyScriptArgs),
    /// List languages with syntax highlighting.
    Languages,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::CopyScript(args) => args.execute(),
        Commands::Languages => commands::languages::execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
