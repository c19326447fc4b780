//! Localhost-only guard for command routes.
//!
//! Command routes mutate the content tree and are meant for the local CLI.
//! Requests whose peer address is not a loopback address are rejected with
//! `400 Bad Request`. Requests without connection info (no peer known) are
//! rejected too.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Message returned to rejected peers.
pub(crate) const LOCALHOST_ONLY: &str = "This request is only allowed for localhost.";

/// Reject requests that do not come from a loopback address.
pub(crate) async fn require_localhost(request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    match peer {
        Some(addr) if addr.ip().is_loopback() => next.run(request).await,
        _ => {
            tracing::warn!(
                peer = ?peer,
                method = %request.method(),
                uri = %request.uri(),
                "Rejected command request from non-local peer"
            );
            (StatusCode::BAD_REQUEST, LOCALHOST_ONLY).into_response()
        }
    }
}
