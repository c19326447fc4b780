//! Rendering source documents into the cache directory.
//!
//! The cache directory mirrors the source directory segment for segment.
//! Markdown documents are rendered to `.html` files, other files are
//! optionally byte-copied, symbolic links are skipped. Nothing here ever
//! deletes from the destination tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::markdown::MarkdownRenderer;
use crate::{HTML_EXTENSION, MARKDOWN_EXTENSION};

/// Options for mirroring a whole directory with [`render_tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeOptions {
    /// Replace destination files that already exist.
    pub overwrite: bool,
    /// Copy non-markdown files into the destination tree.
    pub copy_others: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            copy_others: true,
        }
    }
}

/// Check whether a path has the markdown extension.
#[must_use]
pub fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION)
}

/// Return `path` with its extension replaced by `extension` (without the dot).
#[must_use]
pub fn change_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Render markdown file `src` to HTML file `dst`.
///
/// `dst` defaults to `src` with the extension replaced by `.html` when empty.
/// The destination is created if missing and truncated if it exists; its
/// parent directory is created as needed.
pub fn render_file(src: &Path, dst: &Path) -> Result<(), RenderError> {
    let dst = if dst.as_os_str().is_empty() {
        change_extension(src, HTML_EXTENSION)
    } else {
        dst.to_path_buf()
    };

    let markdown = fs::read_to_string(src).map_err(|e| RenderError::io(src, e))?;
    let html = MarkdownRenderer::new().render_markdown(&markdown);

    if let Some(parent) = dst.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| RenderError::io(parent, e))?;
    }
    fs::write(&dst, html).map_err(|e| RenderError::io(&dst, e))?;

    tracing::debug!(src = %src.display(), dst = %dst.display(), "Rendered markdown file");
    Ok(())
}

/// Render everything under `src` into `dst`.
///
/// `src` may be a single file or a directory. For a directory, each markdown
/// file is rendered to the mirrored path with an `.html` extension, other
/// files are copied when [`TreeOptions::copy_others`] is set, and
/// destination directories are created as needed. Existing destination files
/// are left untouched unless [`TreeOptions::overwrite`] is set.
///
/// When `dst` lies inside `src`, the destination directory itself is skipped
/// while walking the source.
pub fn render_tree(src: &Path, dst: &Path, options: TreeOptions) -> Result<(), RenderError> {
    let meta = fs::metadata(src).map_err(|e| RenderError::io(src, e))?;

    if !meta.is_dir() {
        return mirror_file(src, dst, options);
    }

    fs::create_dir_all(dst).map_err(|e| RenderError::io(dst, e))?;
    let root = fs::canonicalize(dst).map_err(|e| RenderError::io(dst, e))?;

    mirror_dir(src, dst, &root, options)
}

/// Mirror directory `src` into `dst`, never descending into `root`.
fn mirror_dir(
    src: &Path,
    dst: &Path,
    root: &Path,
    options: TreeOptions,
) -> Result<(), RenderError> {
    fs::create_dir_all(dst).map_err(|e| RenderError::io(dst, e))?;

    for entry in fs::read_dir(src).map_err(|e| RenderError::io(src, e))? {
        let entry = entry.map_err(|e| RenderError::io(src, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| RenderError::io(&entry.path(), e))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_symlink() {
            tracing::debug!(path = %src_path.display(), "Skipping symbolic link");
            continue;
        }

        if file_type.is_dir() {
            let canonical =
                fs::canonicalize(&src_path).map_err(|e| RenderError::io(&src_path, e))?;
            if canonical == root {
                tracing::debug!(path = %src_path.display(), "Skipping destination directory");
                continue;
            }
            mirror_dir(&src_path, &dst_path, root, options)?;
        } else {
            mirror_file(&src_path, &dst_path, options)?;
        }
    }

    Ok(())
}

/// Render or copy a single non-directory entry.
fn mirror_file(src: &Path, dst: &Path, options: TreeOptions) -> Result<(), RenderError> {
    if is_markdown(src) {
        let dst = change_extension(dst, HTML_EXTENSION);
        if !options.overwrite && dst.exists() {
            tracing::debug!(dst = %dst.display(), "Keeping existing rendered file");
            return Ok(());
        }
        return render_file(src, &dst);
    }

    if !options.copy_others {
        return Ok(());
    }
    if !options.overwrite && dst.exists() {
        tracing::debug!(dst = %dst.display(), "Keeping existing copied file");
        return Ok(());
    }
    copy_file(src, dst)
}

/// Copy the contents and permissions of file `src` to `dst`.
///
/// The destination is created if missing and replaced if it exists.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), RenderError> {
    fs::copy(src, dst).map_err(|e| RenderError::io(src, e))?;
    Ok(())
}

/// Recursively copy directory `src` into `dst`.
///
/// The destination is created if missing. Symbolic links are skipped.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<(), RenderError> {
    if !src.is_dir() {
        return Err(RenderError::DirectoryNotFound(src.to_path_buf()));
    }

    fs::create_dir_all(dst).map_err(|e| RenderError::io(dst, e))?;

    for entry in fs::read_dir(src).map_err(|e| RenderError::io(src, e))? {
        let entry = entry.map_err(|e| RenderError::io(src, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| RenderError::io(&entry.path(), e))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else if !file_type.is_symlink() {
            copy_file(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("notes/hello.md")));
        assert!(!is_markdown(Path::new("notes/hello.txt")));
        assert!(!is_markdown(Path::new("notes/md")));
    }

    #[test]
    fn test_change_extension() {
        assert_eq!(
            change_extension(Path::new("/cache/posts/hello.md"), "html"),
            PathBuf::from("/cache/posts/hello.html")
        );
        assert_eq!(
            change_extension(Path::new("/cache/README"), "html"),
            PathBuf::from("/cache/README.html")
        );
    }

    #[test]
    fn test_render_file_writes_html() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("hello.md");
        let dst = temp.path().join("out/hello.html");
        write(&src, "# Hello");

        render_file(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(&dst).unwrap(), "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_render_file_empty_destination_defaults_to_html_sibling() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("hello.md");
        write(&src, "text");

        render_file(&src, Path::new("")).unwrap();

        assert!(temp.path().join("hello.html").is_file());
    }

    #[test]
    fn test_render_file_truncates_existing_output() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("hello.md");
        let dst = temp.path().join("hello.html");
        write(&src, "short");
        write(&dst, &"x".repeat(1024));

        render_file(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(&dst).unwrap(), "<p>short</p>\n");
    }

    #[test]
    fn test_render_file_missing_source_is_not_found() {
        let temp = tempfile::tempdir().unwrap();

        let err = render_file(&temp.path().join("nope.md"), &temp.path().join("nope.html"))
            .unwrap_err();

        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_render_tree_mirrors_directory() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("cache");
        write(&src.join("index.md"), "# Index");
        write(&src.join("posts/hello.md"), "# Hello");
        write(&src.join("posts/image.png"), "png");

        render_tree(&src, &dst, TreeOptions::default()).unwrap();

        assert!(dst.join("index.html").is_file());
        assert!(dst.join("posts/hello.html").is_file());
        assert_eq!(fs::read_to_string(dst.join("posts/image.png")).unwrap(), "png");
        assert!(!dst.join("posts/hello.md").exists());
    }

    #[test]
    fn test_render_tree_without_copy_others_skips_assets() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("cache");
        write(&src.join("hello.md"), "# Hello");
        write(&src.join("image.png"), "png");

        let options = TreeOptions {
            overwrite: false,
            copy_others: false,
        };
        render_tree(&src, &dst, options).unwrap();

        assert!(dst.join("hello.html").is_file());
        assert!(!dst.join("image.png").exists());
    }

    #[test]
    fn test_render_tree_keeps_existing_output_without_overwrite() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("cache");
        write(&src.join("hello.md"), "# Hello");
        write(&dst.join("hello.html"), "stale");

        render_tree(&src, &dst, TreeOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(dst.join("hello.html")).unwrap(), "stale");
    }

    #[test]
    fn test_render_tree_overwrite_replaces_existing_output() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("cache");
        write(&src.join("hello.md"), "# Hello");
        write(&dst.join("hello.html"), "stale");

        let options = TreeOptions {
            overwrite: true,
            copy_others: true,
        };
        render_tree(&src, &dst, options).unwrap();

        assert_eq!(
            fs::read_to_string(dst.join("hello.html")).unwrap(),
            "<h1>Hello</h1>\n"
        );
    }

    #[test]
    fn test_render_tree_skips_destination_inside_source() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = src.join("_cache");
        write(&src.join("index.md"), "# Index");
        write(&src.join("posts/hello.md"), "# Hello");

        render_tree(&src, &dst, TreeOptions::default()).unwrap();

        assert!(dst.join("index.html").is_file());
        assert!(dst.join("posts/hello.html").is_file());
        assert!(!dst.join("_cache").exists());
    }

    #[test]
    fn test_render_tree_destination_inside_source_is_repeatable() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = src.join("_cache");
        write(&src.join("hello.md"), "# Hello");

        render_tree(&src, &dst, TreeOptions::default()).unwrap();
        render_tree(&src, &dst, TreeOptions::default()).unwrap();

        let mut entries: Vec<_> = fs::read_dir(&dst)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        entries.sort();
        assert_eq!(entries, vec![std::ffi::OsString::from("hello.html")]);
    }

    #[test]
    fn test_render_tree_single_file_source() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("hello.md");
        write(&src, "# Hello");

        render_tree(&src, &temp.path().join("out/hello.md"), TreeOptions::default()).unwrap();

        assert!(temp.path().join("out/hello.html").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_render_tree_skips_symlinks() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("cache");
        write(&src.join("real.md"), "# Real");
        std::os::unix::fs::symlink(src.join("real.md"), src.join("link.md")).unwrap();

        render_tree(&src, &dst, TreeOptions::default()).unwrap();

        assert!(dst.join("real.html").is_file());
        assert!(!dst.join("link.html").exists());
    }

    #[test]
    fn test_copy_dir_copies_nested_files() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("res");
        let dst = temp.path().join("copy");
        write(&src.join("css/site.css"), "body {}");
        write(&src.join("logo.svg"), "<svg/>");

        copy_dir(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("css/site.css")).unwrap(), "body {}");
        assert_eq!(fs::read_to_string(dst.join("logo.svg")).unwrap(), "<svg/>");
    }

    #[test]
    fn test_copy_dir_missing_source_fails() {
        let temp = tempfile::tempdir().unwrap();

        let err = copy_dir(&temp.path().join("missing"), &temp.path().join("copy")).unwrap_err();

        assert!(matches!(err, RenderError::DirectoryNotFound(_)));
    }
}
