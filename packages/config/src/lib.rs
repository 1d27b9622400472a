#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard configuration loaded from `crime_dashboard.toml`.
//!
//! Every field has a default, so the file is optional. The
//! `CRIME_DASHBOARD_DB` environment variable overrides the database path;
//! command-line flags are applied on top by the binaries.

use std::path::{Path, PathBuf};

use crime_dashboard_report_models::{DEFAULT_TOP_N, MalformedFieldPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "crime_dashboard.toml";

/// Default location of the incidents `SQLite` database.
pub const DEFAULT_DATABASE_PATH: &str = "data/crime_data.db";

/// Environment variable overriding [`DashboardConfig::database_path`].
pub const DATABASE_ENV_VAR: &str = "CRIME_DASHBOARD_DB";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Runtime configuration for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Path to the incidents `SQLite` database.
    pub database_path: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Number of rows kept by top-N reports.
    pub top_n: usize,
    /// Handling of values whose hour or year cannot be extracted.
    pub malformed_fields: MalformedFieldPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            top_n: DEFAULT_TOP_N,
            malformed_fields: MalformedFieldPolicy::default(),
        }
    }
}

impl DashboardConfig {
    /// Replaces the database path when an override is present.
    #[must_use]
    pub fn with_database_override(mut self, database_path: Option<String>) -> Self {
        if let Some(path) = database_path.filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid {
                message: "top_n must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

/// Parses a config from a TOML string.
///
/// # Errors
///
/// Returns [`ConfigError`] if the TOML is malformed, contains unknown keys,
/// or has out-of-range values.
pub fn parse_config(toml_str: &str) -> Result<DashboardConfig, ConfigError> {
    let config: DashboardConfig = toml::de::from_str(toml_str)?;
    config.validate()
}

/// Loads the config from `path`, or from [`DEFAULT_CONFIG_PATH`] if it
/// exists, then applies the [`DATABASE_ENV_VAR`] override.
///
/// An explicitly given path must exist; a missing default file yields the
/// defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let config = match path {
        Some(path) => read_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                read_file(default_path)?
            } else {
                log::debug!("No {DEFAULT_CONFIG_PATH} found, using defaults");
                DashboardConfig::default()
            }
        }
    };

    Ok(config.with_database_override(std::env::var(DATABASE_ENV_VAR).ok()))
}

fn read_file(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded config from {}", path.display());
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.top_n, 10);
        assert_eq!(config.malformed_fields, MalformedFieldPolicy::Fail);
    }

    #[test]
    fn parses_all_fields() {
        let config = parse_config(
            r#"
            database_path = "/srv/crime.db"
            bind_addr = "0.0.0.0"
            port = 9000
            top_n = 5
            malformed_fields = "skip"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/crime.db"));
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.malformed_fields, MalformedFieldPolicy::Skip);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            parse_config("colour = \"dark\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_zero_top_n() {
        assert!(matches!(
            parse_config("top_n = 0"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn database_override() {
        let config = DashboardConfig::default().with_database_override(Some("x.db".to_string()));
        assert_eq!(config.database_path, PathBuf::from("x.db"));

        let config = DashboardConfig::default().with_database_override(Some("  ".to_string()));
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("crime_dashboard_config_missing.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(load(Some(&path)), Err(ConfigError::Io { .. })));
    }
}
