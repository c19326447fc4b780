//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use quire_config::RunningConfig;
use quire_tree::ContentService;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Content tree service.
    pub(crate) service: Arc<dyn ContentService>,
    /// Settings the server was started with.
    pub(crate) config: RunningConfig,
}

impl AppState {
    /// Build an absolute URL for a path on this server.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }
}
