//! Notes API endpoint.
//!
//! Returns detached snapshots of tree nodes: the node itself, its immediate
//! children and its parent.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use quire_tree::NodeSnapshot;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/notes/ (root node).
pub(crate) async fn get_root_note(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NodeSnapshot>, ServerError> {
    get_note_impl(String::new(), &state)
}

/// Handle GET /api/notes/{path}.
pub(crate) async fn get_note(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<NodeSnapshot>, ServerError> {
    get_note_impl(path, &state)
}

fn get_note_impl(path: String, state: &AppState) -> Result<Json<NodeSnapshot>, ServerError> {
    match state.service.fetch_copy(&path) {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err(ServerError::NoteNotFound(path)),
    }
}
