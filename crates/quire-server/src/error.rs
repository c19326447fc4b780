//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quire_config::ConfigError;
use quire_tree::TreeError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No node at the given path.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// Content tree error.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Configuration error (e.g. while restarting).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (e.g. binding the listener).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server loop is gone.
    #[error("Server is not running")]
    Stopped,
}

impl ServerError {
    /// HTTP status reported for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoteNotFound(_) | Self::Tree(TreeError::SourceNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Tree(TreeError::InvalidSegment(_) | TreeError::NotMarkdown(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Tree(TreeError::NodeExists(_)) => StatusCode::CONFLICT,
            Self::Tree(_) | Self::Config(_) | Self::Json(_) | Self::Io(_) | Self::Stopped => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NoteNotFound(path) => json!({"error": "Note not found", "path": path}),
            _ => json!({"error": self.to_string()}),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, axum::Json(body)).into_response()
    }
}
