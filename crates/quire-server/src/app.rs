//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{localhost, security};
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let request_logging = state.config.request_logging;

    let page_routes = Router::new()
        .route("/", get(handlers::home::root))
        .route("/home", get(handlers::home::home));

    let api_routes = Router::new()
        .route("/api/notes/", get(handlers::notes::get_root_note))
        .route("/api/notes/{*path}", get(handlers::notes::get_note));

    let cmd_routes = Router::new()
        .route(
            "/cmd/markdown/render",
            post(handlers::commands::render_markdown),
        )
        .route("/cmd/tree", get(handlers::commands::get_tree))
        .route_layer(axum::middleware::from_fn(localhost::require_localhost));

    let mut router = Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .merge(cmd_routes)
        .layer(
            ServiceBuilder::new()
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        );

    if request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}
