//! HTTP middleware.

pub(crate) mod localhost;
pub(crate) mod security;
