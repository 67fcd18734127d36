// ⚙️ Configuration - optional YAML file, every field defaulted
// CLI flags are applied on top by the binaries

use crate::estimator::{FightQuery, ScoringPolicy};
use crate::records::Category;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

const DEFAULT_DATA_PATH: &str = "data/game_history.csv";
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

/// Root configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Location of game_history.csv
    pub data_path: PathBuf,
    /// Picks shown when the boss page opens
    pub query: FightQuery,
    pub policy: ScoringPolicy,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            query: FightQuery::default(),
            policy: ScoringPolicy::default(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        let cfg: DemoConfig =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                source,
                path: path.to_path_buf(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg)
    }

    /// File config when a path is given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for category in Category::ALL {
            let value = self.query.value(category);
            if !category.contains(value) {
                return Err(ValidationError::InvalidField {
                    field: format!("query.{}", category.name().to_lowercase()),
                    message: format!("`{value}` is not one of {:?}", category.domain()),
                });
            }
        }

        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.level".to_string(),
                message: format!("unknown level `{}`", self.logging.level),
            });
        }

        if self.server.addr.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "server.addr".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Logging configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Write logs here instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Option<Level> {
        Level::from_str(&self.level).ok()
    }
}

/// HTTP server configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config at {}", path.display())]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid config at {}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
