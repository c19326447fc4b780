//! Markdown rendering and cache mirroring for Quire.
//!
//! This crate provides:
//! - [`MarkdownRenderer`]: markdown text to HTML conversion (pulldown-cmark)
//! - [`render_file`] and [`render_tree`]: rendering single documents or whole
//!   source directories into the cache directory
//! - [`Renderer`]: the seam used by the content tree to render documents,
//!   with [`HtmlRenderer`] as the filesystem-backed implementation
//! - [`MockRenderer`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), quire_renderer::RenderError> {
//! use std::path::Path;
//! use quire_renderer::{TreeOptions, render_file, render_tree};
//!
//! render_file(Path::new("notes/hello.md"), Path::new("cache/hello.html"))?;
//! render_tree(Path::new("notes"), Path::new("cache"), TreeOptions::default())?;
//! # Ok(())
//! # }
//! ```

mod error;
mod fs;
mod markdown;
#[cfg(feature = "mock")]
mod mock;
mod renderer;

pub use error::RenderError;
pub use fs::{
    TreeOptions, change_extension, copy_dir, copy_file, is_markdown, render_file, render_tree,
};
pub use markdown::MarkdownRenderer;
#[cfg(feature = "mock")]
pub use mock::{MockRenderer, RenderCall};
pub use renderer::{HtmlRenderer, Renderer};

/// Extension of source documents (without the dot).
pub const MARKDOWN_EXTENSION: &str = "md";

/// Extension of rendered documents (without the dot).
pub const HTML_EXTENSION: &str = "html";
