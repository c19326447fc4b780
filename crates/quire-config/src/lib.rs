//! Configuration management for Quire.
//!
//! Quire keeps its state in a repository directory: `$QUIRE_HOME` when set,
//! otherwise `~/.quire`. The repository holds `config.toml`, the resource
//! directory (`res/`, or `$QUIRE_RESOURCES`), and by default the markdown
//! source (`notes/`) and rendered cache (`cache/`) directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Path values additionally expand a leading `~`. Relative paths are
//! resolved against the directory containing `config.toml`.
//!
//! Expanded fields:
//! - `server.host`
//! - `content.source_dir`
//! - `content.cache_dir`
//! - `resource_dir`

mod expand;
mod repo;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use repo::{
    CONFIG_FILENAME, ensure_repo_dir, is_dir_empty, repo_dir, resource_dir, resource_dir_in,
};

/// Application configuration.
///
/// The default leaves every path unset; [`Config::open`] fills them with
/// repository defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding templates and static assets.
    pub resource_dir: PathBuf,
    /// Server configuration.
    pub server: ServerConfig,
    /// Content directories.
    pub content: ContentConfig,

    /// Path to the config file (set on open/new).
    #[serde(skip)]
    pub config_path: PathBuf,
}

/// Server configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Content directories.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Markdown source directory.
    pub source_dir: PathBuf,
    /// Rendered HTML cache directory.
    pub cache_dir: PathBuf,
}

/// Settings the server holds while running. Derived from [`Config`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunningConfig {
    /// Host the server is reachable at.
    pub host: String,
    /// Port the server listens on.
    pub port: u16,
    /// Omit the port from built URLs.
    pub host_only: bool,
    /// Log every request.
    pub request_logging: bool,
}

impl RunningConfig {
    /// Base URL for redirects, e.g. `http://127.0.0.1:8080`.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.host_only {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Address to bind the listener to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Repository directory already has content.
    #[error("Directory is not empty: {} (use --overwrite to replace it)", .0.display())]
    DirectoryNotEmpty(PathBuf),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`QUIRE_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Default configuration for a repository directory.
    ///
    /// Does not touch the filesystem; use [`write_back`](Self::write_back)
    /// to persist it.
    #[must_use]
    pub fn new(repo: &Path) -> Self {
        Self {
            resource_dir: repo.join("res"),
            server: ServerConfig::default(),
            content: ContentConfig {
                source_dir: repo.join("notes"),
                cache_dir: repo.join("cache"),
            },
            config_path: repo.join(CONFIG_FILENAME),
        }
    }

    /// Open the configuration of the default repository.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the repository was never initialized.
    pub fn load() -> Result<Self, ConfigError> {
        Self::open(&repo_dir()?.join(CONFIG_FILENAME))
    }

    /// Open a configuration file.
    ///
    /// Expands environment variables, resolves relative paths against the
    /// file's directory and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist, or a parse,
    /// expansion or validation error.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = path.to_path_buf();

        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Replace host and port, and point the resource directory at the
    /// current default location.
    pub fn reset(&mut self, host: impl Into<String>, port: u16) {
        self.server.host = host.into();
        self.server.port = port;
        if let Some(repo) = self.config_path.parent() {
            self.resource_dir = resource_dir_in(repo);
        }
    }

    /// Write the configuration to [`config_path`](Self::config_path),
    /// creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_back(&self) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(&self.config_path, content).inspect_err(|e| {
            tracing::error!(path = %self.config_path.display(), error = %e, "Failed to write configuration");
        })?;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`open`](Self::open).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        if self.content.source_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "content.source_dir cannot be empty".to_owned(),
            ));
        }
        if self.content.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "content.cache_dir cannot be empty".to_owned(),
            ));
        }
        // Mirroring the source would descend into its own output
        if self.content.cache_dir.starts_with(&self.content.source_dir) {
            return Err(ConfigError::Validation(format!(
                "content.cache_dir ({}) cannot be inside content.source_dir ({})",
                self.content.cache_dir.display(),
                self.content.source_dir.display()
            )));
        }

        Ok(())
    }

    /// Derive the settings the server runs with.
    #[must_use]
    pub fn running_config(&self) -> RunningConfig {
        RunningConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            host_only: self.server.port == 80,
            request_logging: true,
        }
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.content.source_dir =
            expand::expand_path(&self.content.source_dir, "content.source_dir")?;
        self.content.cache_dir = expand::expand_path(&self.content.cache_dir, "content.cache_dir")?;
        self.resource_dir = expand::expand_path(&self.resource_dir, "resource_dir")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    ///
    /// Missing values fall back to the repository defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: &Path, default: &str| {
            if path.as_os_str().is_empty() {
                config_dir.join(default)
            } else {
                config_dir.join(path)
            }
        };

        self.content.source_dir = resolve(&self.content.source_dir, "notes");
        self.content.cache_dir = resolve(&self.content.cache_dir, "cache");
        self.resource_dir = resolve(&self.resource_dir, "res");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = Config::new(Path::new("/repo"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.content.source_dir, PathBuf::from("/repo/notes"));
        assert_eq!(config.content.cache_dir, PathBuf::from("/repo/cache"));
        assert_eq!(config.resource_dir, PathBuf::from("/repo/res"));
        assert_eq!(config.config_path, PathBuf::from("/repo/config.toml"));
    }

    #[test]
    fn test_default_config_leaves_paths_unset() {
        let config = Config::default();

        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.content, ContentConfig::default());
        assert!(config.resource_dir.as_os_str().is_empty());
        assert!(config.config_path.as_os_str().is_empty());
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_open_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");

        let err = Config::open(&path).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(ref p) if p == &path));
    }

    #[test]
    fn test_open_resolves_relative_paths() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
resource_dir = "assets"

[server]
host = "localhost"
port = 3000

[content]
source_dir = "docs"
"#,
        )
        .unwrap();

        let config = Config::open(&path).unwrap();

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.resource_dir, temp.path().join("assets"));
        assert_eq!(config.content.source_dir, temp.path().join("docs"));
        assert_eq!(config.content.cache_dir, temp.path().join("cache"));
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_open_keeps_absolute_paths() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[content]\nsource_dir = \"/srv/notes\"\n").unwrap();

        let config = Config::open(&path).unwrap();

        assert_eq!(config.content.source_dir, PathBuf::from("/srv/notes"));
    }

    #[test]
    fn test_open_invalid_toml() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[server\nhost = ").unwrap();

        let err = Config::open(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_open_rejects_zero_port() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[server]\nport = 0\n").unwrap();

        let err = Config::open(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::new(Path::new("/repo"));
        config.server.host = String::new();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("server.host cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_cache_inside_source() {
        let mut config = Config::new(Path::new("/repo"));
        config.content.cache_dir = PathBuf::from("/repo/notes/.cache");

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("content.cache_dir"));
    }

    #[test]
    fn test_validate_rejects_cache_equal_to_source() {
        let mut config = Config::new(Path::new("/repo"));
        config.content.cache_dir = config.content.source_dir.clone();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_allows_sibling_with_shared_prefix() {
        let mut config = Config::new(Path::new("/repo"));
        config.content.cache_dir = PathBuf::from("/repo/notes-cache");

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_open_rejects_cache_inside_source() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[content]\nsource_dir = \"notes\"\ncache_dir = \"notes/_cache\"\n",
        )
        .unwrap();

        let err = Config::open(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_write_back_then_open() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = Config::new(temp.path());
        config.reset("0.0.0.0", 9090);

        config.write_back().unwrap();
        let reopened = Config::open(&temp.path().join(CONFIG_FILENAME)).unwrap();

        assert_eq!(reopened, config);
    }

    #[test]
    fn test_write_back_truncates() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "# stale\n".repeat(1000)).unwrap();
        let config = Config::new(temp.path());

        config.write_back().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.contains("[server]"));
    }

    #[test]
    fn test_reset_updates_server() {
        let mut config = Config::new(Path::new("/repo"));
        config.server.host = "old".to_owned();

        config.reset("127.0.0.1", 4000);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_running_config_host_only_on_port_80() {
        let mut config = Config::new(Path::new("/repo"));
        config.reset("blog.local", 80);

        let running = config.running_config();

        assert!(running.host_only);
        assert!(running.request_logging);
        assert_eq!(running.base_url(), "http://blog.local");
    }

    #[test]
    fn test_running_config_includes_port() {
        let config = Config::new(Path::new("/repo"));

        let running = config.running_config();

        assert!(!running.host_only);
        assert_eq!(running.base_url(), "http://127.0.0.1:8080");
        assert_eq!(running.bind_addr(), "127.0.0.1:8080");
    }
}
