//! CLI command implementations.

pub(crate) mod add;
pub(crate) mod fetch;
pub(crate) mod init;
pub(crate) mod markdown;
pub(crate) mod start;

pub(crate) use add::AddArgs;
pub(crate) use fetch::FetchArgs;
pub(crate) use init::InitArgs;
pub(crate) use markdown::MarkdownCommand;
pub(crate) use start::StartArgs;

use quire_config::Config;

use crate::error::CliError;

/// Port of the running server: the explicit one, or the configured one.
fn server_port(port: Option<u16>) -> Result<u16, CliError> {
    match port {
        Some(port) => Ok(port),
        None => Ok(Config::load()?.server.port),
    }
}
