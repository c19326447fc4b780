//! `quire markdown` command implementations.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use quire_renderer::{TreeOptions, render_file, render_tree};

use crate::error::CliError;
use crate::output::Output;

/// Markdown commands.
#[derive(Subcommand)]
pub(crate) enum MarkdownCommand {
    /// Render markdown to HTML without touching the server.
    Render(RenderArgs),
}

impl MarkdownCommand {
    /// Execute the markdown subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Render(args) => args.execute(),
        }
    }
}

/// Arguments for the markdown render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file or directory to render.
    input: PathBuf,

    /// Output path (default: input with an .html extension; required for directories).
    output: Option<PathBuf>,
}

impl RenderArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let written = self.render()?;
        output.success(&format!("Rendered {}", written.display()));
        Ok(())
    }

    /// Render and return the path written to.
    fn render(&self) -> Result<PathBuf, CliError> {
        if self.input.is_dir() {
            let Some(dst) = &self.output else {
                return Err(CliError::Validation(
                    "an output directory is required when rendering a directory".to_owned(),
                ));
            };
            let options = TreeOptions {
                overwrite: true,
                copy_others: true,
            };
            render_tree(&self.input, dst, options)?;
            return Ok(dst.clone());
        }

        let dst = self.output.as_deref().unwrap_or(Path::new(""));
        render_file(&self.input, dst)?;
        Ok(if dst.as_os_str().is_empty() {
            quire_renderer::change_extension(&self.input, quire_renderer::HTML_EXTENSION)
        } else {
            dst.to_path_buf()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_file_default_output() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("note.md");
        fs::write(&input, "# Note").unwrap();
        let args = RenderArgs {
            input,
            output: None,
        };

        let written = args.render().unwrap();

        assert_eq!(written, temp.path().join("note.html"));
        assert_eq!(fs::read_to_string(written).unwrap(), "<h1>Note</h1>\n");
    }

    #[test]
    fn test_render_directory_requires_output() {
        let temp = tempfile::tempdir().unwrap();
        let args = RenderArgs {
            input: temp.path().to_path_buf(),
            output: None,
        };

        let err = args.render().unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_render_directory_overwrites_and_copies() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("out");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/page.md"), "# Page").unwrap();
        fs::write(src.join("logo.svg"), "<svg/>").unwrap();
        fs::create_dir_all(dst.join("sub")).unwrap();
        fs::write(dst.join("sub/page.html"), "stale").unwrap();
        let args = RenderArgs {
            input: src,
            output: Some(dst.clone()),
        };

        args.render().unwrap();

        assert_eq!(
            fs::read_to_string(dst.join("sub/page.html")).unwrap(),
            "<h1>Page</h1>\n"
        );
        assert!(dst.join("logo.svg").is_file());
    }
}
