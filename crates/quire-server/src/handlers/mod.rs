//! HTTP request handlers.

pub(crate) mod commands;
pub(crate) mod home;
pub(crate) mod notes;
