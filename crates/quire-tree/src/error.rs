//! Tree error types.

use std::path::PathBuf;

use quire_renderer::RenderError;

/// Error returned by tree derivation and growth.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A path segment is empty, relative (`.`/`..`), or contains a separator.
    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),
    /// The parent already has a child under this segment or display name.
    #[error("{0} already exists")]
    NodeExists(String),
    /// The raw filesystem entry backing a segment does not exist.
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// A leaf entry lacks the markdown extension.
    #[error("{} is not a markdown file", .0.display())]
    NotMarkdown(PathBuf),
    /// Filesystem error while inspecting the source or creating the cache.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path the failing operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The render collaborator failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
