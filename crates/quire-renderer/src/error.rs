//! Render error types.

use std::path::{Path, PathBuf};

/// Error returned when rendering or mirroring fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source directory does not exist.
    #[error("directory {} not exists", .0.display())]
    DirectoryNotFound(PathBuf),
    /// I/O error on a source or destination path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path the failing operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Wrap an I/O error with the path it occurred on.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Underlying I/O error kind, if any.
    #[must_use]
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            Self::DirectoryNotFound(_) => None,
        }
    }
}
