//! `quire init` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use quire_config::{Config, ensure_repo_dir, repo_dir};

use crate::error::CliError;
use crate::output::Output;

/// Resource directory looked up in the working directory when none is given.
const DEFAULT_RESOURCES: &str = "resources";

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Host the server is reachable at.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port the server listens on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Replace an existing, non-empty repository.
    #[arg(long)]
    overwrite: bool,

    /// Resource directory copied into the repository (default: ./resources if present).
    #[arg(short, long)]
    resources: Option<PathBuf>,
}

impl InitArgs {
    /// Execute the init command.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository exists and is not empty (without
    /// `--overwrite`), if an explicit resource directory is missing, or on
    /// I/O failure.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let repo = repo_dir()?;

        let config = self.init_repo(&repo, &output)?;

        output.success(&format!("Initialized repository at {}", repo.display()));
        output.info(&format!("Config: {}", config.config_path.display()));
        output.info(&format!(
            "Notes directory: {}",
            config.content.source_dir.display()
        ));
        Ok(())
    }

    /// Lay out the repository at `repo` and write its config.
    fn init_repo(self, repo: &Path, output: &Output) -> Result<Config, CliError> {
        ensure_repo_dir(repo, self.overwrite)?;

        let mut config = Config::new(repo);
        config.reset(self.host, self.port);
        config.validate()?;

        match self.resources {
            Some(resources) => quire_renderer::copy_dir(&resources, &config.resource_dir)?,
            None if Path::new(DEFAULT_RESOURCES).is_dir() => {
                quire_renderer::copy_dir(Path::new(DEFAULT_RESOURCES), &config.resource_dir)?;
            }
            None => {
                output.warning("No resources directory found, starting with an empty one");
                fs::create_dir_all(&config.resource_dir)?;
            }
        }

        fs::create_dir_all(&config.content.source_dir)?;
        fs::create_dir_all(&config.content.cache_dir)?;
        config.write_back()?;

        tracing::info!(repo = %repo.display(), "Initialized repository");
        Ok(config)
    }
}
