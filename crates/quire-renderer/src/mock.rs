//! Mock renderer implementation for testing.
//!
//! Provides [`MockRenderer`] for unit testing without writing rendered output.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::RenderError;
use crate::fs::TreeOptions;
use crate::renderer::Renderer;

/// A call recorded by [`MockRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderCall {
    /// [`Renderer::render_document`] was called.
    Document {
        /// Source document path.
        raw: PathBuf,
        /// Destination path.
        rendered: PathBuf,
    },
    /// [`Renderer::render_directory`] was called.
    Directory {
        /// Source directory path.
        raw: PathBuf,
        /// Destination directory path.
        rendered: PathBuf,
        /// Mirroring options.
        options: TreeOptions,
    },
}

/// Mock renderer for testing.
///
/// Records every call in order and touches no files. Use
/// [`fail_on`](Self::fail_on) to make calls for a given source path fail.
///
/// # Example
///
/// ```ignore
/// use quire_renderer::{MockRenderer, RenderCall, Renderer};
///
/// let renderer = MockRenderer::new();
/// renderer.render_document(Path::new("/src/a.md"), Path::new("/cache/a.html"))?;
/// assert_eq!(renderer.calls().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockRenderer {
    calls: Mutex<Vec<RenderCall>>,
    failing: Mutex<Vec<PathBuf>>,
}

impl MockRenderer {
    /// Create a new mock renderer with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make calls whose source path equals `raw` fail with a permission error.
    #[must_use]
    pub fn fail_on(self, raw: impl Into<PathBuf>) -> Self {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(raw.into());
        self
    }

    /// Calls recorded so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, raw: &Path, call: RenderCall) -> Result<(), RenderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        let failing = self.failing.lock().unwrap_or_else(PoisonError::into_inner);
        if failing.iter().any(|p| p == raw) {
            return Err(RenderError::io(
                raw,
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ));
        }
        Ok(())
    }
}

impl Renderer for MockRenderer {
    fn render_document(&self, raw: &Path, rendered: &Path) -> Result<(), RenderError> {
        self.record(
            raw,
            RenderCall::Document {
                raw: raw.to_path_buf(),
                rendered: rendered.to_path_buf(),
            },
        )
    }

    fn render_directory(
        &self,
        raw: &Path,
        rendered: &Path,
        options: TreeOptions,
    ) -> Result<(), RenderError> {
        self.record(
            raw,
            RenderCall::Directory {
                raw: raw.to_path_buf(),
                rendered: rendered.to_path_buf(),
                options,
            },
        )
    }
}
