//! Command endpoints used by the local CLI.
//!
//! Mounted under `/cmd` behind the localhost guard.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use quire_tree::{AddOptions, NodeSnapshot};
use serde::Deserialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Form body for POST /cmd/markdown/render.
#[derive(Debug, Deserialize)]
pub(crate) struct RenderForm {
    /// Path relative to the source root.
    path: String,
    /// Display name of the terminal node (defaults to its segment).
    #[serde(default)]
    name: String,
    /// Mirror whole directories.
    #[serde(default = "default_true")]
    recursive: bool,
    /// Replace existing rendered files.
    #[serde(default)]
    overwrite: bool,
    /// Copy non-markdown files while mirroring.
    #[serde(default = "default_true")]
    copy_others: bool,
}

fn default_true() -> bool {
    true
}

impl RenderForm {
    fn options(&self) -> AddOptions {
        AddOptions {
            recursive: self.recursive,
            render: true,
            overwrite: self.overwrite,
            copy_others: self.copy_others,
        }
    }
}

/// Handle POST /cmd/markdown/render.
///
/// Adds the path to the tree and renders it into the cache.
pub(crate) async fn render_markdown(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RenderForm>,
) -> Result<Json<NodeSnapshot>, ServerError> {
    let options = form.options();
    let service = Arc::clone(&state.service);

    // Rendering touches the filesystem and holds the tree's write lock.
    let snapshot = tokio::task::spawn_blocking(move || {
        service.add(&form.path, &form.name, options)
    })
    .await
    .map_err(|e| ServerError::Io(std::io::Error::other(e)))??;

    Ok(Json(snapshot))
}

/// Handle GET /cmd/tree: the whole tree with every level of children.
pub(crate) async fn get_tree(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let tree = serde_json::to_value(state.service.fetch_all())?;
    Ok(Json(tree))
}
