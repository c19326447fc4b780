//! Landing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use quire_tree::NodeSnapshot;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /: permanent redirect to the home page.
pub(crate) async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let url = state.url("/home");
    tracing::debug!(url = %url, "Redirecting");
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, url)])
}

/// Handle GET /home: listing of the top-level notes.
pub(crate) async fn home(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NodeSnapshot>, ServerError> {
    state
        .service
        .fetch_copy("")
        .map(Json)
        .ok_or_else(|| ServerError::NoteNotFound(String::new()))
}
