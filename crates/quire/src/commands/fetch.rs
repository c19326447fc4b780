//! `quire fetch` command implementation.

use clap::Args;

use crate::client::ServerClient;
use crate::commands::server_port;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fetch command.
#[derive(Args)]
pub(crate) struct FetchArgs {
    /// Path relative to the notes directory (default: the root).
    #[arg(default_value = "")]
    path: String,

    /// Port of the running server (default: from config).
    #[arg(short, long)]
    port: Option<u16>,
}

impl FetchArgs {
    /// Execute the fetch command: print the node snapshot as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or the node is missing.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let client = ServerClient::local(server_port(self.port)?);

        let node = client.fetch(&self.path)?;

        output.data(&serde_json::to_string_pretty(&node)?)?;
        Ok(())
    }
}
