//! `quire start` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use quire_config::Config;
use quire_server::run_server;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the start command.
#[derive(Args)]
pub(crate) struct StartArgs {
    /// Path to configuration file (default: config.toml in the repository).
    #[arg(short, long, env = "QUIRE_CONFIG")]
    config: Option<PathBuf>,
}

impl StartArgs {
    /// Execute the start command.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository was never initialized or the
    /// server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = match self.config {
            Some(path) => Config::open(&path)?,
            None => Config::load()?,
        };

        fs::create_dir_all(&config.content.source_dir)?;
        fs::create_dir_all(&config.content.cache_dir)?;

        let running = config.running_config();
        output.highlight(&format!("Serving on {}", running.base_url()));
        output.info(&format!(
            "Notes directory: {}",
            config.content.source_dir.display()
        ));
        output.info(&format!(
            "Cache directory: {}",
            config.content.cache_dir.display()
        ));

        run_server(config).await?;

        Ok(())
    }
}
