//! Environment variable and tilde expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//! - `~` at the start of a path - expands to `$HOME` (paths only)

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, lookup)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| env_error(field, &e.cause))
}

/// Expand a leading `~` and `${VAR}` references in a path.
///
/// Paths that are not valid UTF-8 are returned unchanged.
pub(crate) fn expand_path(path: &Path, field: &str) -> Result<PathBuf, ConfigError> {
    let Some(value) = path.to_str() else {
        return Ok(path.to_path_buf());
    };
    if !value.starts_with('~') && !value.contains("${") {
        return Ok(path.to_path_buf());
    }

    let home = || std::env::var("HOME").ok();
    shellexpand::full_with_context(value, home, lookup)
        .map(|cow| PathBuf::from(cow.into_owned()))
        .map_err(|e| env_error(field, &e.cause))
}

fn lookup(var: &str) -> Result<Option<String>, LookupError> {
    match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(LookupError {
            var_name: var.to_owned(),
        }),
    }
}

fn env_error(field: &str, cause: &LookupError) -> ConfigError {
    ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", cause.var_name),
    }
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUIRE_TEST_VAR_SIMPLE", "hello");
        }
        let result = expand_env("${QUIRE_TEST_VAR_SIMPLE}", "test.field").unwrap();
        assert_eq!(result, "hello");
        unsafe {
            std::env::remove_var("QUIRE_TEST_VAR_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUIRE_UNSET_VAR_TEST");
        }
        let result = expand_env("${QUIRE_UNSET_VAR_TEST:-default}", "test.field").unwrap();
        assert_eq!(result, "default");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUIRE_MISSING_VAR_TEST");
        }
        let err = expand_env("${QUIRE_MISSING_VAR_TEST}", "server.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("QUIRE_MISSING_VAR_TEST"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("$VAR", "test.field").unwrap();
        assert_eq!(result, "$VAR");
    }

    #[test]
    fn test_expand_path_tilde() {
        let Ok(home) = std::env::var("HOME") else {
            return;
        };
        let result = expand_path(Path::new("~/.quire"), "repo").unwrap();
        assert_eq!(result, PathBuf::from(home).join(".quire"));
    }

    #[test]
    fn test_expand_path_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUIRE_TEST_DATA", "/data");
        }
        let result = expand_path(Path::new("${QUIRE_TEST_DATA}/notes"), "content.source_dir").unwrap();
        assert_eq!(result, PathBuf::from("/data/notes"));
        unsafe {
            std::env::remove_var("QUIRE_TEST_DATA");
        }
    }

    #[test]
    fn test_expand_path_literal_unchanged() {
        let result = expand_path(Path::new("/srv/notes"), "content.source_dir").unwrap();
        assert_eq!(result, PathBuf::from("/srv/notes"));
    }
}
