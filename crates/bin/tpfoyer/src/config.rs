//! Settings for the `tpfoyer` tool.
//!
//! Resolution order, lowest to highest: built-in defaults, the TOML file,
//! environment variables. The file is `tpfoyer.toml` in the working
//! directory and may be absent; a path passed with `--config` must exist.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_PATH: &str = "tpfoyer.toml";

const DEFAULT_DATABASE_URL: &str = "sqlite:tpfoyer.db?mode=rwc";
const DEFAULT_LOG_FILTER: &str = "tpfoyer=info,tpfoyer_app=info";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Resolve settings from `explicit` (or [`DEFAULT_PATH`]) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit file is unreadable, any file
    /// is malformed, or the database URL ends up empty.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve(explicit, |key| std::env::var(key).ok())
    }

    fn resolve(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::read(path)?,
            None => Self::read_if_present(Path::new(DEFAULT_PATH))?,
        };

        if let Some(url) = env("TPFOYER_DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(filter) = env("RUST_LOG").or_else(|| env("TPFOYER_LOG")) {
            config.logging.filter = filter;
        }

        if config.database.url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_if_present(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::read(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("database url must not be empty")]
    EmptyDatabaseUrl,
}
