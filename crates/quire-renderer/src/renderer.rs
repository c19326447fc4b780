//! Render collaborator used by the content tree.

use std::path::Path;

use crate::error::RenderError;
use crate::fs::{TreeOptions, render_file, render_tree};

/// Converts source documents into their rendered cache form.
///
/// The content tree calls this when a node is added with rendering enabled.
/// Implementations must be safe to share across threads.
pub trait Renderer: Send + Sync {
    /// Render a single document, creating or truncating `rendered`.
    fn render_document(&self, raw: &Path, rendered: &Path) -> Result<(), RenderError>;

    /// Mirror a whole source directory into `rendered`.
    fn render_directory(
        &self,
        raw: &Path,
        rendered: &Path,
        options: TreeOptions,
    ) -> Result<(), RenderError>;
}

/// Filesystem-backed [`Renderer`] producing HTML files.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render_document(&self, raw: &Path, rendered: &Path) -> Result<(), RenderError> {
        render_file(raw, rendered)
    }

    fn render_directory(
        &self,
        raw: &Path,
        rendered: &Path,
        options: TreeOptions,
    ) -> Result<(), RenderError> {
        render_tree(raw, rendered, options)
    }
}
