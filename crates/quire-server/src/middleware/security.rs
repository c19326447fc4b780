//! Response headers that lock down how browsers treat Quire pages.
//!
//! Every response carries a Content-Security-Policy, `nosniff` and a
//! frame denial. Existing values set by handlers are overridden.
//!
//! Notes are markdown rendered to static HTML, and markdown may embed raw
//! HTML. Nothing Quire serves needs JavaScript, so the policy forbids all
//! scripts with `script-src 'none'`: a `<script>` tag or inline handler
//! smuggled into a note never runs.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Policy for rendered notes: same-origin resources, inline styles from
/// the renderer, images possibly inlined as data URLs, no scripts.
const CSP: &str = "default-src 'self'; \
                   script-src 'none'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src 'self' data:; \
                   frame-ancestors 'none'";

fn overriding(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

pub(crate) fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("content-security-policy", CSP)
}

pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("x-content-type-options", "nosniff")
}

pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("x-frame-options", "DENY")
}
