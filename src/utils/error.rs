use std::path::PathBuf;

use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read environment file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Required configuration value is missing: {0}")]
    Missing(&'static str),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::EnvFile { .. } => "ENV_FILE_ERROR",
            ConfigError::Missing(_) => "MISSING_VALUE",
        }
    }

    pub fn log(&self) {
        match self {
            ConfigError::EnvFile { path, source } => {
                error!(code = self.code(), path = %path.display(), error = %source, "Environment file error");
            }
            ConfigError::Missing(name) => {
                error!(code = self.code(), variable = %name, "Configuration error");
            }
        }
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
