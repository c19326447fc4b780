//! HTTP client for the running server's command and notes endpoints.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use ureq::Agent;

use crate::error::CliError;

/// Default HTTP timeout in seconds. Rendering a large directory may take a while.
const DEFAULT_TIMEOUT: u64 = 120;

/// Unreserved characters: A-Z a-z 0-9 - . _ ~
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Parameters of a render command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct RenderRequest {
    pub(crate) path: String,
    pub(crate) name: String,
    pub(crate) recursive: bool,
    pub(crate) overwrite: bool,
    pub(crate) copy_others: bool,
}

impl RenderRequest {
    /// URL-encoded form fields.
    fn form(&self) -> [(&'static str, String); 5] {
        [
            ("path", self.path.clone()),
            ("name", self.name.clone()),
            ("recursive", self.recursive.to_string()),
            ("overwrite", self.overwrite.to_string()),
            ("copy_others", self.copy_others.to_string()),
        ]
    }
}

/// Client for a Quire server.
pub(crate) struct ServerClient {
    agent: Agent,
    base_url: String,
}

impl ServerClient {
    /// Client for the server listening on `port` of this machine.
    ///
    /// Command routes only answer loopback peers, so the client always
    /// connects through `127.0.0.1`.
    pub(crate) fn local(port: u16) -> Self {
        Self::new(&format!("http://127.0.0.1:{port}"))
    }

    fn new(base_url: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Add and render a path; returns the added node's snapshot.
    pub(crate) fn render(&self, request: &RenderRequest) -> Result<Value, CliError> {
        let url = format!("{}/cmd/markdown/render", self.base_url);
        tracing::debug!(url = %url, path = %request.path, "Sending render command");

        let response = self.agent.post(&url).send_form(request.form())?;
        read_json(response)
    }

    /// Snapshot of the node at `path` (empty for the root).
    pub(crate) fn fetch(&self, path: &str) -> Result<Value, CliError> {
        let url = format!("{}{}", self.base_url, note_url_path(path));
        tracing::debug!(url = %url, "Fetching note");

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()?;
        read_json(response)
    }
}

fn read_json(response: ureq::http::Response<ureq::Body>) -> Result<Value, CliError> {
    let status = response.status().as_u16();
    let body = response.into_body().read_to_string()?;

    if status >= 400 {
        return Err(CliError::Http { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}

/// URL path of the notes endpoint for a relative note path.
///
/// Empty segments are dropped and every segment is percent-encoded.
fn note_url_path(path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| utf8_percent_encode(s, SEGMENT_ENCODE_SET).to_string())
        .collect();
    format!("/api/notes/{}", segments.join("/"))
}
