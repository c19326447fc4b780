//! CLI error types.

use quire_config::ConfigError;
use quire_renderer::RenderError;
use quire_server::ServerError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("Request failed: {0}")]
    Request(#[from] ureq::Error),

    #[error("Server responded with {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid server response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
