//! `quire add` command implementation.

use clap::Args;

use crate::client::{RenderRequest, ServerClient};
use crate::commands::server_port;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the add command.
#[derive(Args)]
pub(crate) struct AddArgs {
    /// Path relative to the notes directory.
    path: String,

    /// Display name of the added node (default: last path segment).
    #[arg(short, long, default_value = "")]
    name: String,

    /// Only create the directory in the cache, do not render its contents.
    #[arg(long)]
    no_recursive: bool,

    /// Replace existing rendered files.
    #[arg(long)]
    overwrite: bool,

    /// Skip non-markdown files when rendering a directory.
    #[arg(long)]
    no_copy_others: bool,

    /// Port of the running server (default: from config).
    #[arg(short, long)]
    port: Option<u16>,
}

impl AddArgs {
    /// Execute the add command.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or rejects the path.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let client = ServerClient::local(server_port(self.port)?);

        let node = client.render(&self.request())?;

        output.success(&format!(
            "Added {} ({})",
            node["name"].as_str().unwrap_or_default(),
            node["renderedPath"].as_str().unwrap_or_default()
        ));
        Ok(())
    }

    fn request(&self) -> RenderRequest {
        RenderRequest {
            path: self.path.clone(),
            name: self.name.clone(),
            recursive: !self.no_recursive,
            overwrite: self.overwrite,
            copy_others: !self.no_copy_others,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_request_defaults() {
        let args = AddArgs {
            path: "posts/hello.md".to_owned(),
            name: String::new(),
            no_recursive: false,
            overwrite: false,
            no_copy_others: false,
            port: Some(8080),
        };

        assert_eq!(
            args.request(),
            RenderRequest {
                path: "posts/hello.md".to_owned(),
                name: String::new(),
                recursive: true,
                overwrite: false,
                copy_others: true,
            }
        );
    }

    #[test]
    fn test_request_negated_flags() {
        let args = AddArgs {
            path: "posts".to_owned(),
            name: "Posts".to_owned(),
            no_recursive: true,
            overwrite: true,
            no_copy_others: true,
            port: None,
        };

        let request = args.request();

        assert!(!request.recursive);
        assert!(request.overwrite);
        assert!(!request.copy_others);
    }
}
