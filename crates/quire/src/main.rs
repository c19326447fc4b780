//! Quire CLI - markdown notes mirrored into a rendered HTML cache.
//!
//! Provides commands for:
//! - `init`: Create the repository directory and its config
//! - `start`: Start the server
//! - `markdown render`: Render markdown files locally
//! - `add`: Add a path to the running server's tree and render it
//! - `fetch`: Print a node of the running server's tree

mod client;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, FetchArgs, InitArgs, MarkdownCommand, StartArgs};
use error::CliError;
use output::Output;

/// Quire - markdown notes server.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the repository directory.
    Init(InitArgs),
    /// Start the server.
    Start(StartArgs),
    /// Markdown commands, mainly for debugging.
    #[command(subcommand)]
    Markdown(MarkdownCommand),
    /// Add a path to the running server and render it.
    Add(AddArgs),
    /// Print a node from the running server.
    Fetch(FetchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Init(args) => args.execute(),
        Commands::Start(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::Markdown(cmd) => cmd.execute(),
        Commands::Add(args) => args.execute(),
        Commands::Fetch(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_flags() {
        let cli = Cli::try_parse_from([
            "quire",
            "add",
            "posts",
            "--name",
            "Posts",
            "--no-recursive",
            "--overwrite",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Add(_)));
    }

    #[test]
    fn test_parse_markdown_render() {
        let cli = Cli::try_parse_from(["quire", "markdown", "render", "in.md"]).unwrap();

        assert!(matches!(cli.command, Commands::Markdown(MarkdownCommand::Render(_))));
    }

    #[test]
    fn test_parse_fetch_without_path() {
        let cli = Cli::try_parse_from(["quire", "fetch"]).unwrap();

        assert!(matches!(cli.command, Commands::Fetch(_)));
    }

    #[test]
    fn test_init_rejects_invalid_port() {
        let result = Cli::try_parse_from(["quire", "init", "--port", "70000"]);

        assert!(result.is_err());
    }
}
