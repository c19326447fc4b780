//! HTTP server for Quire.
//!
//! Serves the content tree as JSON and accepts commands from the local CLI:
//! - `GET /` redirects to `/home`
//! - `GET /home` and `GET /api/notes/{path}` return node snapshots
//! - `POST /cmd/markdown/render` adds a path to the tree and renders it
//! - `GET /cmd/tree` exports the whole tree
//!
//! Command routes only accept requests from loopback addresses.
//!
//! # Quick Start
//!
//! ```ignore
//! use quire_config::Config;
//! use quire_server::run_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load().unwrap();
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! CLI ──HTTP──► axum router (quire-server)
//!                  │
//!                  ├─► /api, /home ──► fetch_copy ──► read lock ──┐
//!                  │                                                ├─► ContentTree
//!                  └─► /cmd (localhost) ──► add ──► write lock ────┘
//!                                             │
//!                                             └─► Renderer ──► cache dir
//! ```

mod app;
mod error;
mod handlers;
mod lifecycle;
mod middleware;
mod state;

use quire_config::Config;

pub use error::ServerError;
pub use lifecycle::{Server, ServerCommand, ServerHandle};

/// Start serving `config` and run until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the listener fails (e.g. the port is taken).
pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let (server, handle) = Server::new(config);
    handle.start().await?;
    server.run().await
}
