use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::game::{DEFAULT_COLS, DEFAULT_ROWS, MAX_DIMENSION, MIN_DIMENSION};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

/// Board dimensions, fixed for a session.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

/// Where and how saved games are stored.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Fixed key the session is saved under in both stores.
    pub session_key: String,
    /// Directory used as the local cache.
    pub local_dir: PathBuf,
    /// Shared directory used as the remote store. Without one every save is
    /// local only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_dir: Option<PathBuf>,
    /// Deadline for a single remote call.
    pub remote_timeout_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig {
            session_key: "c4".to_string(),
            local_dir: PathBuf::from("saves"),
            remote_dir: None,
            remote_timeout_ms: 5_000,
        }
    }
}

impl PersistenceConfig {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }
}

/// Log output. The terminal belongs to the UI, so logs go to a file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: PathBuf,
    /// `tracing-subscriber` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: PathBuf::from("connect-four.log"),
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.rows < MIN_DIMENSION || self.board.cols < MIN_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "board.rows and board.cols must be >= {MIN_DIMENSION}"
            )));
        }
        if self.board.rows > MAX_DIMENSION || self.board.cols > MAX_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "board.rows and board.cols must be <= {MAX_DIMENSION}"
            )));
        }
        if self.persistence.session_key.is_empty()
            || !self
                .persistence
                .session_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(
                "persistence.session_key must be non-empty and use only [A-Za-z0-9_-]".into(),
            ));
        }
        if self.persistence.remote_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "persistence.remote_timeout_ms must be > 0".into(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
